//! Application error type and its HTTP mapping.
//!
//! Every failure surfaced to a client belongs to one of five categories, each
//! with its own status code and machine-readable `code`:
//!
//! | Variant | Status | Code |
//! |---|---|---|
//! | [`AppError::InvalidInput`] | 400 | `invalid_input` |
//! | [`AppError::NotFound`] | 404 | `not_found` |
//! | [`AppError::AliasTaken`] | 409 | `alias_taken` |
//! | [`AppError::AllocationExhausted`] | 500 | `allocation_exhausted` |
//! | [`AppError::StoreUnavailable`] | 503 | `store_unavailable` |
//!
//! Messages are shown verbatim by the frontend, so they never carry storage
//! details. The underlying cause of a store failure is logged instead.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned inside `{"error": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidInput { message: String, details: Value },
    #[error("{message}")]
    AliasTaken { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn alias_taken(alias: &str) -> Self {
        Self::AliasTaken {
            message: "Alias is already taken".to_string(),
            details: json!({ "alias": alias }),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(attempts: usize) -> Self {
        Self::AllocationExhausted {
            message: "Could not allocate a free alias".to_string(),
            details: json!({ "attempts": attempts }),
        }
    }

    pub fn store_unavailable() -> Self {
        Self::StoreUnavailable {
            message: "Storage is temporarily unavailable".to_string(),
            details: json!({}),
        }
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::AliasTaken { .. } => (StatusCode::CONFLICT, "alias_taken"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::AllocationExhausted { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "allocation_exhausted")
            }
            AppError::StoreUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.parts();
        let (message, details) = match self {
            AppError::InvalidInput { message, details }
            | AppError::AliasTaken { message, details }
            | AppError::NotFound { message, details }
            | AppError::AllocationExhausted { message, details }
            | AppError::StoreUnavailable { message, details } => (message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
            && db.constraint() == Some("links_alias_key")
        {
            return AppError::AliasTaken {
                message: "Alias is already taken".to_string(),
                details: json!({}),
            };
        }

        tracing::error!(error = %e, "Database operation failed");
        AppError::store_unavailable()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();

        AppError::invalid_input("Request validation failed", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_input(
            "Malformed request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_input(
            "Malformed query string",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
