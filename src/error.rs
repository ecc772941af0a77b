use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Errors reported to API clients as `{error, reason}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client supplied input failed validation.
    #[error("{0}")]
    Parameters(&'static str),
    /// The sample store could not be reached or the statement failed.
    #[error("Cannot connect to database")]
    Database(#[from] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    reason: String,
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Parameters(_) => "parameters",
            ApiError::Database(_) => "database",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Parameters(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!(error = %e, "sample store failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind(),
            reason: self.to_string(),
        })
    }
}
