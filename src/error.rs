use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable label clients switch on to pick a notification.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Unauthenticated => "unauthenticated",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation",
            Error::RemoteUnavailable(_) => "remote_unavailable",
            Error::BadRequest(_) => "bad_request",
            _ => "internal",
        }
    }

    pub fn interview_not_found(id: uuid::Uuid) -> Self {
        Error::NotFound(format!("Interview {} not found", id))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let kind = self.kind();
        let (status, error_message, details) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Sign in to access interviews".to_string(),
                None,
            ),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::Validation(err) => {
                let details = serde_json::to_value(err.field_errors()).ok();
                (StatusCode::BAD_REQUEST, err.to_string(), details)
            }
            Error::RemoteUnavailable(msg) => {
                tracing::warn!(error = %msg, "remote store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Interview storage is temporarily unavailable".to_string(),
                    None,
                )
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(fields) => json!({ "error": error_message, "kind": kind, "fields": fields }),
            None => json!({ "error": error_message, "kind": kind }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::RemoteUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::RemoteUnavailable(err.to_string())
    }
}
