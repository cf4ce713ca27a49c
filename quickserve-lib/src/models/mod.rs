//! Records exchanged with the quickServe API.
//!
//! Every type here mirrors the server's JSON representation. Fields the
//! server is known to send as `null` are normalised on the way in so the
//! rest of the crate never has to distinguish "missing" from "empty".

use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize};

mod customer;
mod worker;

pub use customer::{Customer, CustomerPatch, Role};
pub use worker::Worker;

/// Opaque identifier assigned by the server. It arrives either as a number or as a string and is
/// sent back in exactly the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_owned()),
        })
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_owned())
    }
}

/// Treat an explicit `null` the same as an absent string field.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_record_id_from_str() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Number(42));
        assert_eq!(
            "c-42".parse::<RecordId>().unwrap(),
            RecordId::Text("c-42".into())
        );
    }

    #[test]
    fn test_record_id_keeps_wire_form() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "7"]"#).unwrap();

        assert_eq!(ids, vec![RecordId::Number(7), RecordId::Text("7".into())]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[7,"7"]"#);
    }
}
