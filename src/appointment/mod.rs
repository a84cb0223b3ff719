mod requests;
mod responses;

use actix_web::web;
use chrono::Utc;

use crate::{
    database::{appointments, treated_patients},
    protocol::{ApiError, StatusResponse},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(send_message)
        .service(list_appointments)
        .service(mark_treated)
        .service(list_treated_patients);
}

crate::post_funcs! {
    (send_message, "/send-message", DbPool, SendMessageRequest),
    (mark_treated, "/treated-patients", DbPool, MarkTreatedRequest),
}

crate::get_funcs! {
    (list_appointments, "/appointments", DbPool),
    (list_treated_patients, "/treated-patients", DbPool),
}

async fn send_message_impl(
    pool: web::Data<DbPool>,
    info: SendMessageRequest,
) -> Result<StatusResponse, ApiError> {
    let data = info.into_new_appointment()?;
    let id = crate::database::run(&pool, move |conn| appointments::insert(conn, &data)).await?;
    tracing::info!(id, "appointment stored");

    Ok(StatusResponse::with_id("Message stored", id))
}

async fn list_appointments_impl(pool: web::Data<DbPool>) -> Result<Vec<AppointmentItem>, ApiError> {
    let apts = crate::database::run(&pool, appointments::list).await?;

    Ok(apts.into_iter().map(AppointmentItem::from).collect())
}

async fn mark_treated_impl(
    pool: web::Data<DbPool>,
    info: MarkTreatedRequest,
) -> Result<StatusResponse, ApiError> {
    let (appointment_id, data) = info.into_treatment(Utc::now().naive_utc())?;
    let id = crate::database::run(&pool, move |conn| {
        treated_patients::record_treatment(conn, appointment_id, &data)
    })
    .await?;
    tracing::info!(id, ?appointment_id, "treated patient stored");

    Ok(StatusResponse::with_id("Treated patient stored", id))
}

async fn list_treated_patients_impl(
    pool: web::Data<DbPool>,
) -> Result<Vec<TreatedPatientItem>, ApiError> {
    let patients = crate::database::run(&pool, treated_patients::list).await?;

    Ok(patients.into_iter().map(TreatedPatientItem::from).collect())
}
