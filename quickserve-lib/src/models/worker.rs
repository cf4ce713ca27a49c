use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    models::{RecordId, null_as_empty},
    service_data::{ServiceData, parse_service_data},
};

/// A service provider as returned by `GET /workers`.
///
/// `service_type` and `expertise_of_service` are kept raw because older records store them as
/// JSON-encoded strings. Use [`Worker::services`] to get them decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub service_type: Value,
    #[serde(default)]
    pub expertise_of_service: Value,
}

impl Worker {
    pub fn services(&self) -> ServiceData {
        parse_service_data(self)
    }
}
