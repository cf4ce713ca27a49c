//! Data-access services.
//!
//! Each service wraps one API resource: reads go through the shared [`QueryCache`], writes go
//! straight to the API and then invalidate the affected key. Every failure is caught here and
//! turned into a [`QueryError`], so nothing above this layer deals with transport errors.
//!
//! [`QueryCache`]: crate::cache::QueryCache

use thiserror::Error;
use tracing::warn;

use crate::api::{ApiError, FieldErrors};

mod customers;
mod workers;

pub use customers::{CUSTOMERS_KEY, Customers};
pub use workers::{WORKERS_KEY, Workers};

/// A failed query or mutation, ready to be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
    /// Per-field validation messages, empty unless the server rejected a write with them.
    pub field_errors: FieldErrors,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    /// Keep the server's message when it sent one, otherwise use `fallback`.
    pub(crate) fn from_api(err: &ApiError, fallback: &str) -> Self {
        warn!(%err, "{fallback}");

        Self {
            message: err.server_message().unwrap_or(fallback).to_owned(),
            field_errors: err.field_errors().cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_api_prefers_server_message() {
        let err = ApiError::from_status(
            422,
            &json!({ "message": "Email already in use", "errors": { "email": "taken" } })
                .to_string(),
        );

        let query_err = QueryError::from_api(&err, "Failed to update customer");

        assert_eq!(query_err.message, "Email already in use");
        assert_eq!(query_err.field_errors.first("email"), Some("taken"));
    }

    #[test]
    fn test_from_api_fallback() {
        let err = ApiError::from_status(500, "");

        let query_err = QueryError::from_api(&err, "Failed to update customer");

        assert_eq!(query_err.to_string(), "Failed to update customer");
        assert!(query_err.field_errors.is_empty());
    }
}
