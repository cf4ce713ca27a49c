//! Normalisation of a worker's service fields.
//!
//! `service_type` and `expertise_of_service` may arrive already structured or as JSON encoded
//! into a string. Decoding never fails outward: malformed input is logged and replaced by a
//! fallback value.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::models::Worker;

/// Placeholder shown when a worker has no service types.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Service name to rating.
pub type ServiceRatings = BTreeMap<String, Value>;

/// Decoded service fields of a [`Worker`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceData {
    pub service_types: Vec<String>,
    pub ratings: ServiceRatings,
}

impl ServiceData {
    pub fn display(&self) -> String {
        format_services_display(Some(&self.service_types), Some(&self.ratings))
    }
}

/// Outcome of decoding a JSON-encoded field.
enum Decoded<T> {
    Value(T),
    Malformed(serde_json::Error),
}

impl<T: DeserializeOwned> Decoded<T> {
    fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => Decoded::Value(value),
            Err(err) => Decoded::Malformed(err),
        }
    }

    fn or_fallback<F>(self, field: &str, raw: &str, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Decoded::Value(value) => value,
            Decoded::Malformed(err) => {
                warn!(field, raw, %err, "Could not decode service field, using fallback");
                fallback()
            }
        }
    }
}

/// Decode both service fields of `worker`.
///
/// A malformed `service_type` string becomes a single-element list holding the raw string. A
/// malformed `expertise_of_service` string becomes an empty mapping.
pub fn parse_service_data(worker: &Worker) -> ServiceData {
    ServiceData {
        service_types: service_types(&worker.service_type),
        ratings: service_ratings(&worker.expertise_of_service),
    }
}

fn service_types(value: &Value) -> Vec<String> {
    match value {
        Value::String(raw) if raw.trim().is_empty() => Vec::new(),
        Value::String(raw) => {
            let decoded = Decoded::<Value>::parse(raw)
                .or_fallback("service_type", raw, || Value::String(raw.clone()));

            match decoded {
                // A JSON string literal is still a single service name
                Value::String(name) => vec![name],
                Value::Array(_) => names(&decoded),
                // Numbers, objects, ...: keep what the server sent verbatim
                _ => vec![raw.clone()],
            }
        }
        other => names(other),
    }
}

fn names(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(name) => vec![name.clone()],
        Value::Array(items) => items.iter().filter_map(name_of).collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        other => vec![other.to_string()],
    }
}

fn name_of(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

fn service_ratings(value: &Value) -> ServiceRatings {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::String(raw) if raw.trim().is_empty() => ServiceRatings::new(),
        Value::String(raw) => {
            Decoded::<ServiceRatings>::parse(raw).or_fallback(
                "expertise_of_service",
                raw,
                ServiceRatings::new,
            )
        }
        _ => ServiceRatings::new(),
    }
}

/// Render service types as a comma separated list, annotating each with its rating when one is
/// known, e.g. `"Plumbing(5), Painting"`.
pub fn format_services_display(
    service_types: Option<&[String]>,
    ratings: Option<&ServiceRatings>,
) -> String {
    let types = match service_types {
        Some(types) if !types.is_empty() => types,
        _ => return NOT_SPECIFIED.into(),
    };

    let ratings = match ratings {
        Some(ratings) if !ratings.is_empty() => ratings,
        _ => return types.join(", "),
    };

    types
        .iter()
        .map(|name| match ratings.get(name).and_then(rating_text) {
            Some(rating) => format!("{name}({rating})"),
            None => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn rating_text(rating: &Value) -> Option<String> {
    match rating {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn worker(service_type: Value, expertise_of_service: Value) -> Worker {
        Worker {
            id: 1.into(),
            name: "Sam".into(),
            service_type,
            expertise_of_service,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_service_type_encoded_array() {
        let data = parse_service_data(&worker(json!(r#"["Plumbing","Painting"]"#), Value::Null));

        assert_eq!(data.service_types, strings(&["Plumbing", "Painting"]));
    }

    #[test]
    fn test_service_type_already_decoded() {
        let data = parse_service_data(&worker(json!(["Plumbing"]), Value::Null));

        assert_eq!(data.service_types, strings(&["Plumbing"]));
    }

    #[test]
    fn test_service_type_malformed_keeps_raw() {
        let data = parse_service_data(&worker(json!("Plumbing, Painting"), Value::Null));

        assert_eq!(data.service_types, strings(&["Plumbing, Painting"]));
    }

    #[test]
    fn test_service_type_unterminated_array_keeps_raw() {
        let data = parse_service_data(&worker(json!(r#"["Plumbing""#), Value::Null));

        assert_eq!(data.service_types, strings(&[r#"["Plumbing""#]));
    }

    #[test]
    fn test_expertise_encoded_object() {
        let data = parse_service_data(&worker(json!(["A"]), json!(r#"{"A": 5}"#)));

        assert_eq!(data.ratings.get("A"), Some(&json!(5)));
    }

    #[test]
    fn test_expertise_malformed_is_empty() {
        for raw in ["{A: 5}", "not json", "[1, 2]", "{"] {
            let data = parse_service_data(&worker(json!(["A"]), json!(raw)));
            assert!(data.ratings.is_empty(), "{raw} should decode to nothing");
        }
    }

    #[test]
    fn test_missing_fields() {
        let data = parse_service_data(&worker(Value::Null, Value::Null));

        assert_eq!(data, ServiceData::default());
        assert_eq!(data.display(), NOT_SPECIFIED);
    }

    #[test]
    fn test_format_without_ratings() {
        let types = strings(&["A", "B"]);

        assert_eq!(
            format_services_display(Some(&types), Some(&ServiceRatings::new())),
            "A, B"
        );
        assert_eq!(format_services_display(Some(&types), None), "A, B");
        assert_eq!(format_services_display(Some(&strings(&["A"])), None), "A");
    }

    #[test]
    fn test_format_with_ratings() {
        let types = strings(&["A", "B"]);
        let ratings = ServiceRatings::from([("A".to_string(), json!(5))]);

        assert_eq!(format_services_display(Some(&types), Some(&ratings)), "A(5), B");
    }

    #[test]
    fn test_format_not_specified() {
        assert_eq!(format_services_display(None, None), "Not specified");
        assert_eq!(format_services_display(Some(&[]), None), "Not specified");
    }

    #[test]
    fn test_worker_display_end_to_end() {
        let worker = worker(json!(r#"["Plumbing","Painting"]"#), json!({ "Painting": 4.5 }));

        assert_eq!(worker.services().display(), "Plumbing, Painting(4.5)");
    }
}
