use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "adminId", default, deserialize_with = "crate::utils::lenient_text")]
    pub admin_id: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient_text")]
    pub password: Option<String>,
}
