//! The captured-request record.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Header name → values in arrival order.
pub type HeaderMultimap = BTreeMap<String, Vec<String>>;

/// One captured HTTP request, stored as one line of a tenant log.
///
/// Text fields and headers accept `null` or a missing key and decode to their
/// empty value, so older or hand-edited lines still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Append time, RFC3339 with offset at second precision; a zero offset is written as `Z`.
    #[serde(rename = "time", default, serialize_with = "rfc3339")]
    pub timestamp: Option<DateTime<FixedOffset>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HeaderMultimap,

    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
}

impl LogRecord {
    /// Capture a request now, using the local clock and offset.
    ///
    /// Invalid UTF-8 in `body` is replaced with U+FFFD.
    pub fn capture(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: HeaderMultimap,
        body: &[u8],
    ) -> Self {
        Self {
            timestamp: Some(Local::now().fixed_offset().trunc_subsecs(0)),
            method: method.into(),
            path: path.into(),
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

fn rfc3339<S>(timestamp: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timestamp {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        None => serializer.serialize_none(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
