//! Maps backend errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_code: String,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self { status, error_code, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, error_code) = match &err {
            Error::InvalidQuery { .. } => (StatusCode::BAD_REQUEST, "invalid_query"),
            Error::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
            Error::EngineUnavailable { .. } => (StatusCode::BAD_GATEWAY, "engine_unavailable"),
            Error::InvalidEngineResponse { .. } => (StatusCode::BAD_GATEWAY, "invalid_engine_response"),
            Error::MalformedOccurrenceRecord { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "malformed_occurrence_record")
            }
            Error::ReportingFailure { .. } | Error::ReadConfig { .. } | Error::ParseConfig { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        if status.is_server_error() {
            tracing::error!("request failed: {err}");
        }
        Self::new(status, error_code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };
        (self.status, Json(body)).into_response()
    }
}
