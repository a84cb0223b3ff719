use actix_web::{error::JsonPayloadError, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Default, Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl StatusResponse {
    pub fn new<S: ToString>(status: S) -> Self {
        Self {
            status: status.to_string(),
            id: None,
        }
    }

    pub fn with_id<S: ToString>(status: S, id: i32) -> Self {
        Self {
            status: status.to_string(),
            id: Some(id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct LoginErrorResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    MalformedBody(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            ApiError::MissingFields | ApiError::MalformedBody(_) => builder.json(ErrorResponse {
                error: self.to_string(),
            }),
            ApiError::InvalidCredentials => builder.json(LoginErrorResponse {
                status: "error",
                message: self.to_string(),
            }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                builder.finish()
            }
        }
    }
}

/// Turns extractor failures (bad JSON, wrong content type, oversized body)
/// into a 400 with the usual `{"error": ...}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ApiError::MalformedBody(format!("Invalid JSON body: {}", err)).into()
    })
}
