pub mod credentials;
mod requests;

use actix_web::{route, web, HttpResponse};

use crate::{
    database,
    protocol::{ApiError, StatusResponse},
    DbPool,
};

use self::{credentials::CredentialStore, requests::*};

/// Whether the admin purge also wipes pending appointments. Treated-patient
/// history is always purged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgePolicy {
    pub include_appointments: bool,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(delete_all).service(login);
}

crate::post_funcs! {
    (login, "/login", dyn CredentialStore, LoginRequest),
}

#[route("/admin/delete-all", method = "GET", method = "POST")]
async fn delete_all(
    pool: web::Data<DbPool>,
    policy: web::Data<PurgePolicy>,
) -> Result<HttpResponse, ApiError> {
    let policy = *policy.get_ref();
    let summary = database::run(&pool, move |conn| database::purge(conn, policy)).await?;
    tracing::info!(
        treated_patients = summary.treated_patients,
        appointments = summary.appointments,
        "purged stored data"
    );

    Ok(HttpResponse::Ok().json(StatusResponse::new("All data deleted")))
}

async fn login_impl(
    credentials: web::Data<dyn CredentialStore>,
    info: LoginRequest,
) -> Result<StatusResponse, ApiError> {
    let admin_id = info.admin_id.unwrap_or_default();
    let password = info.password.unwrap_or_default();
    let admin_id = admin_id.trim();
    tracing::debug!(admin_id, "login attempt");

    if !credentials.verify(admin_id, password.trim()) {
        tracing::warn!(admin_id, "rejected admin login");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(StatusResponse::new("success"))
}
