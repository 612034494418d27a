use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type ThrottlerResult<T> = Result<T, ThrottlerError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThrottlerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ThrottlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ThrottlerError::InvalidArgument(_) | ThrottlerError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            ThrottlerError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ThrottlerError {
    fn from(err: serde_json::Error) -> Self {
        ThrottlerError::Serialization(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            code,
        }
    }

    pub fn from_throttler_error(err: &ThrottlerError) -> Self {
        let code = err.status_code().as_u16();
        match err {
            ThrottlerError::InvalidArgument(msg) => Self::new("InvalidArgument", msg, code),
            ThrottlerError::Serialization(msg) => Self::new("SerializationError", msg, code),
            ThrottlerError::Configuration(msg) => Self::new("ConfigurationError", msg, code),
        }
    }
}

impl IntoResponse for ThrottlerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from_throttler_error(&self))).into_response()
    }
}
