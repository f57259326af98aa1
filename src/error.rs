use axum::{
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

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed for '{field}': {message}")]
    Field { field: &'static str, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("An active application for this job and candidate already exists")]
    DuplicateApplication,

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Interview is already completed; feedback and outcome are immutable")]
    AlreadyCompleted,

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Error::Field {
            field,
            message: message.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::BadRequest(_) => "bad_request",
            Error::Forbidden(_) => "forbidden",
            Error::NotFound(_) => "not_found",
            Error::InvalidTransition(_) => "invalid_transition",
            Error::InvalidState(_) => "invalid_state",
            Error::Field { .. } | Error::Validation(_) => "validation_error",
            Error::DuplicateApplication => "duplicate_application",
            Error::PreconditionFailed(_) => "precondition_failed",
            Error::AlreadyCompleted => "already_completed",
            Error::Conflict(_) => "conflict",
            Error::Json(_) => "bad_request",
            Error::Anyhow(_) | Error::Internal(_) | Error::Io(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let kind = self.kind();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::InvalidTransition(msg) => (StatusCode::CONFLICT, msg),
            Error::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            err @ Error::Field { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ Error::DuplicateApplication => (StatusCode::CONFLICT, err.to_string()),
            Error::PreconditionFailed(msg) => (StatusCode::PRECONDITION_FAILED, msg),
            err @ Error::AlreadyCompleted => (StatusCode::CONFLICT, err.to_string()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message, "kind": kind }));
        (status, body).into_response()
    }
}
