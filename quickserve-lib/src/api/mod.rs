//! Access to the quickServe REST API.
//!
//! [`AdminApi`] is the seam between the data-access layer and the transport. [`HttpApi`] talks
//! to a real server, [`MemoryApi`] keeps everything in process and backs the tests.

use std::{collections::BTreeMap, fmt::Debug};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::models::{Customer, CustomerPatch, RecordId, Worker};

mod http;
mod memory;

pub use http::HttpApi;
pub use memory::MemoryApi;

#[async_trait]
pub trait AdminApi: Debug + Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, ApiError>;

    async fn update_customer(&self, id: &RecordId, patch: &CustomerPatch) -> Result<(), ApiError>;

    async fn delete_customer(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn list_workers(&self) -> Result<Vec<Worker>, ApiError>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("Server responded with status {status}")]
    Status { status: u16, body: ErrorBody },
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a raw response body. Bodies that are not the expected
    /// error shape are kept as an empty [`ErrorBody`].
    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            body: serde_json::from_str(body).unwrap_or_default(),
        }
    }

    /// The human readable message sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.message.as_deref(),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Status { body, .. } if !body.errors.is_empty() => Some(&body.errors),
            _ => None,
        }
    }
}

/// Error payload attached to rejected requests.
///
/// Both fields are read independently: a field of an unexpected shape is dropped without
/// affecting the other one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub errors: FieldErrors,
}

/// Deserialize `T`, falling back to its default when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Field name to validation messages, as returned for a rejected write.
///
/// The server sends either a single message or a list of messages per field; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Messages>")]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl From<BTreeMap<String, Messages>> for FieldErrors {
    fn from(map: BTreeMap<String, Messages>) -> Self {
        Self(
            map.into_iter()
                .map(|(field, messages)| {
                    let messages = match messages {
                        Messages::One(message) => vec![message],
                        Messages::Many(messages) => messages,
                    };
                    (field, messages)
                })
                .collect(),
        )
    }
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.to_owned());
    }

    /// The first message reported for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Every field paired with its first message.
    pub fn iter_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(field, messages)| {
            messages
                .first()
                .map(|message| (field.as_str(), message.as_str()))
        })
    }
}

/// List endpoints answer with either a bare array or a `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Envelope { data: Vec<T> },
    Bare(Vec<T>),
}

pub(crate) fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    Ok(match serde_json::from_str::<ListBody<T>>(body) {
        Ok(ListBody::Envelope { data }) | Ok(ListBody::Bare(data)) => data,
        // Re-decode as a bare list so the error points at the offending record
        Err(_) => serde_json::from_str::<Vec<T>>(body)?,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_list_bare_and_envelope() {
        let bare: Vec<Customer> = decode_list(r#"[{"id": 1, "name": "Ada"}]"#).unwrap();
        let wrapped: Vec<Customer> =
            decode_list(r#"{"data": [{"id": 1, "name": "Ada"}], "total": 1}"#).unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare.first().unwrap().name, "Ada");
    }

    #[test]
    fn test_decode_list_malformed() {
        let result = decode_list::<Customer>(r#"{"items": []}"#);

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_field_errors_single_and_many() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message": "Invalid data", "errors": {"email": ["invalid", "taken"], "name": "required"}}"#,
        )
        .unwrap();

        assert_eq!(body.message.as_deref(), Some("Invalid data"));
        assert_eq!(body.errors.first("email"), Some("invalid"));
        assert_eq!(body.errors.first("name"), Some("required"));
        assert_eq!(body.errors.first("phone"), None);
    }

    #[test]
    fn test_message_survives_malformed_errors() {
        for body in [
            r#"{"message": "Email already taken", "errors": null}"#,
            r#"{"message": "Email already taken", "errors": []}"#,
            r#"{"message": "Email already taken", "errors": {"email": 5}}"#,
        ] {
            let err = ApiError::from_status(422, body);

            assert_eq!(err.server_message(), Some("Email already taken"), "{body}");
            assert!(err.field_errors().is_none(), "{body}");
        }
    }

    #[test]
    fn test_errors_survive_malformed_message() {
        let err = ApiError::from_status(422, r#"{"message": 42, "errors": {"name": "required"}}"#);

        assert_eq!(err.server_message(), None);
        assert_eq!(err.field_errors().unwrap().first("name"), Some("required"));
    }

    #[test]
    fn test_from_status_tolerates_foreign_bodies() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>");

        assert_eq!(err.server_message(), None);
        assert!(err.field_errors().is_none());
    }
}
