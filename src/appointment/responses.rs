use serde::Serialize;

use crate::models::{appointments::Appointment, treated_patients::TreatedPatient};

#[derive(Debug, Serialize)]
pub struct AppointmentItem {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub treated: bool,
}

impl From<Appointment> for AppointmentItem {
    fn from(data: Appointment) -> Self {
        Self {
            id: data.id,
            name: data.name,
            phone: data.phone,
            email: data.email,
            service: data.service,
            message: data.message,
            treated: data.treated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TreatedPatientItem {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub treated_at: String,
}

impl From<TreatedPatient> for TreatedPatientItem {
    fn from(data: TreatedPatient) -> Self {
        Self {
            id: data.id,
            name: data.name,
            phone: data.phone,
            email: data.email,
            service: data.service,
            message: data.message,
            treated_at: crate::utils::format_time_str(&data.treated_at),
        }
    }
}
