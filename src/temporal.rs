//! Serde helpers for `chrono` date-times that follow converter options.
//!
//! Use with `#[serde(with = "serde_fluent::temporal")]` on a `DateTime<Utc>` field, or
//! `serde_fluent::temporal::option` on an `Option<DateTime<Utc>>`. The written form is
//! picked by [`ConverterOptions::temporal`](crate::ConverterOptions); reading accepts
//! both ISO-8601 text and epoch milliseconds.
//!
//! Inside a converter these fields require the [`TemporalModule`](crate::TemporalModule).
//! Outside of any converter they write ISO-8601 text.
//!
//! ```rust
//! use chrono::{DateTime, TimeZone, Utc};
//! use serde::{Deserialize, Serialize};
//! use serde_fluent::Fluent;
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Event {
//!     #[serde(with = "serde_fluent::temporal")]
//!     at: DateTime<Utc>,
//! }
//!
//! let event = Event { at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap() };
//! let json = Fluent::new().object(event).unwrap().as_text().unwrap().get().unwrap();
//! assert_eq!(json, r#"{"at":"2024-01-15T10:30:00Z"}"#);
//! ```

use crate::{context, TemporalFormat, TEMPORAL_MODULE};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{de, ser, Deserializer, Serializer};
use std::fmt;

fn active_format() -> crate::Result<TemporalFormat> {
    Ok(context::requiring(TEMPORAL_MODULE)?
        .map_or(TemporalFormat::default(), |config| config.options().temporal))
}

/// Writes `value` in the format of the active converter.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match active_format().map_err(<S::Error as ser::Error>::custom)? {
        TemporalFormat::Iso8601 => {
            serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        TemporalFormat::EpochMillis => serializer.serialize_i64(value.timestamp_millis()),
    }
}

/// Reads a date-time from ISO-8601 text or epoch milliseconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    active_format().map_err(<D::Error as de::Error>::custom)?;
    deserializer.deserialize_any(TemporalVisitor)
}

struct TemporalVisitor;

impl<'de> de::Visitor<'de> for TemporalVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an ISO-8601 date-time or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| E::custom(format!("invalid date-time `{}`: {}", value, e)))
    }

    fn visit_i64<E: de::Error>(self, millis: i64) -> Result<Self::Value, E> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| E::custom(format!("timestamp {} out of range", millis)))
    }

    fn visit_u64<E: de::Error>(self, millis: u64) -> Result<Self::Value, E> {
        let millis = i64::try_from(millis)
            .map_err(|_| E::custom(format!("timestamp {} out of range", millis)))?;
        self.visit_i64(millis)
    }
}

/// The same helpers for `Option<DateTime<Utc>>`; `None` is written as null.
pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionVisitor;

        impl<'de> de::Visitor<'de> for OptionVisitor {
            type Value = Option<DateTime<Utc>>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional date-time")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                super::deserialize(deserializer).map(Some)
            }
        }

        deserializer.deserialize_option(OptionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_node, to_node, Node};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Stamp {
        #[serde(with = "crate::temporal")]
        at: DateTime<Utc>,
        #[serde(with = "crate::temporal::option", default)]
        until: Option<DateTime<Utc>>,
    }

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_outside_converter_writes_iso() {
        let node = to_node(&Stamp { at: sample(), until: None }).unwrap();
        assert_eq!(node.get("at").and_then(Node::as_str), Some("2024-01-15T10:30:00Z"));
        assert_eq!(node.get("until"), Some(&Node::Null));
    }

    #[test]
    fn test_reads_millis_and_text() {
        let millis = sample().timestamp_millis();
        let stamp: Stamp = from_node(crate::node!({
            "at": millis,
            "until": "2024-01-15T11:30:00+01:00"
        }))
        .unwrap();
        assert_eq!(stamp.at, sample());
        assert_eq!(stamp.until, Some(sample()));
    }

    #[test]
    fn test_rejects_garbage() {
        let result: crate::Result<Stamp> = from_node(crate::node!({ "at": "yesterday" }));
        assert!(result.is_err());
    }
}
