//! # Error handling
//!
//! Every operation in this crate returns [`ApiError`] on failure. The type maps
//! each failure class to an HTTP status code and a sanitized message, and logs
//! the internal detail through the `tracing` crate instead of sending it to the
//! client. Database errors, SQL text and driver messages never reach the wire.
//!
//! The response body is always the same envelope:
//!
//! ```json
//! { "message": "Cliente with ID '42' not found" }
//! ```
//!
//! Validation failures additionally carry a `details` array with one entry per
//! broken rule.
//!
//! Logging is optional. Install a `tracing` subscriber in the host application
//! to see the internal detail; without one the errors are silently sanitized.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Message returned when a delete is rejected because other rows still
/// reference the target record. The wording is part of the wire contract
/// consumed by the client applications this crate serves.
pub const DEPENDENT_RECORDS_MESSAGE: &str = "Existem dependências deste registro.";

/// Operation error with sanitized responses and internal logging.
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource name as configured on the controller (e.g. "Cliente")
        resource: String,
        /// Id that was requested, when known
        id: Option<String>,
    },

    /// 400 Bad Request, malformed input
    BadRequest {
        /// User-facing message
        message: String,
    },

    /// 422 Unprocessable Entity, one entry per broken rule
    ValidationFailed {
        /// User-facing messages, `field: message`
        errors: Vec<String>,
    },

    /// 500 with the fixed dependency message, delete hit referential integrity
    DependentRecords {
        /// Underlying driver error (logged, not sent)
        internal: DbErr,
    },

    /// 500 Internal Server Error, database failure (detail logged, not sent)
    Database {
        /// User-facing generic message
        message: String,
        /// Underlying error (logged, not sent)
        internal: DbErr,
    },

    /// 500 Internal Server Error, anything else
    Internal {
        /// User-facing generic message
        message: String,
        /// Detail for the log, never for the client
        internal: Option<String>,
    },
}

impl ApiError {
    /// 404 for a missing record.
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// 400 for malformed input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// 422 carrying the broken rules.
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// 500 with the fixed dependency message. Used when a delete trips a
    /// foreign key constraint; the driver error is kept for the log only.
    pub fn dependent_records(internal: DbErr) -> Self {
        Self::DependentRecords { internal }
    }

    /// 500 from a database error. The detail is logged, the client sees a
    /// generic message.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// 500 for non-database failures.
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DependentRecords { .. } | Self::Database { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    format!("{resource} with ID '{id}' not found")
                } else {
                    format!("{resource} not found")
                }
            }
            Self::BadRequest { message } => message.clone(),
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::DependentRecords { .. } => DEPENDENT_RECORDS_MESSAGE.to_string(),
            Self::Database { message, .. } | Self::Internal { message, .. } => message.clone(),
        }
    }

    /// Log internal detail. No-op unless the host installed a subscriber.
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::DependentRecords { internal } => {
                tracing::warn!(error = ?internal, "Delete rejected, record is still referenced");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Sanitized response body.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// What went wrong, safe for end users
    message: String,
    /// Per-rule messages on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                message: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                message: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `DbErr::RecordNotFound` becomes 404, everything else a sanitized 500.
///
/// Foreign key violations on delete are special-cased in the destroy
/// operation before this conversion runs; a raw FK error arriving here is
/// treated like any other database failure.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::Database {
                message: "A database error occurred".to_string(),
                internal: err,
            },
        }
    }
}
