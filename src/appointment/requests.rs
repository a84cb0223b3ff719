use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::{appointments::NewAppointment, treated_patients::NewTreatedPatient},
    protocol::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub message: Option<String>,
}

impl SendMessageRequest {
    pub fn into_new_appointment(self) -> Result<NewAppointment, ApiError> {
        match (self.name, self.phone, self.email, self.service) {
            (Some(name), Some(phone), Some(email), Some(service)) => Ok(NewAppointment {
                name,
                phone,
                email,
                service,
                message: self.message.unwrap_or_default(),
            }),
            _ => Err(ApiError::MissingFields),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkTreatedRequest {
    /// Appointment to flag. Only presence is required; see
    /// [`MarkTreatedRequest::appointment_id`].
    #[serde(default, deserialize_with = "crate::utils::present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub message: Option<String>,
}

impl MarkTreatedRequest {
    /// Splits the request into the appointment to flag (if the id names one
    /// at all) and the row to insert.
    pub fn into_treatment(
        self,
        treated_at: NaiveDateTime,
    ) -> Result<(Option<i32>, NewTreatedPatient), ApiError> {
        match (self.id, self.name, self.phone, self.email, self.service) {
            (Some(id), Some(name), Some(phone), Some(email), Some(service)) => Ok((
                appointment_id(&id),
                NewTreatedPatient {
                    name,
                    phone,
                    email,
                    service,
                    message: self.message.unwrap_or_default(),
                    treated_at,
                },
            )),
            _ => Err(ApiError::MissingFields),
        }
    }
}

/// Integers and numeric strings name an appointment; anything else names none.
fn appointment_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
