use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

/// Error taxonomy for the ledger.
///
/// Every failed operation maps onto exactly one of these kinds; the kind is
/// surfaced to the client alongside a human-readable message so the UI can
/// decide between "fix your input", "you may not do this", and "the record
/// changed under you, refresh".
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: non-positive amount, blank required field, bad enum.
    #[error("{0}")]
    Validation(String),

    /// The actor lacks the capability for this operation.
    #[error("{0}")]
    Forbidden(String),

    /// A payment edit or transition attempted outside the pending window.
    #[error("{0}")]
    InvalidState(String),

    /// An illegal contract status change.
    #[error("{0}")]
    InvalidTransition(String),

    /// The referenced record does not exist or was already deleted.
    #[error("{0}")]
    NotFound(String),

    /// A duplicate active contract for the same (project, contractor) pair.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ApiError {
    /// Stable machine-readable tag, included in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::InvalidTransition(_) => "invalid_transition",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Database(_) => "internal_error",
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            // Terminal-state violations are conflicts with the current record,
            // not bad requests: the client must refresh and re-evaluate.
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!("database error: {e}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        }))
    }
}
