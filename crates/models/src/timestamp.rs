//! ISO-8601 timestamps with microsecond precision, e.g. `2017-09-28T21:03:54.052298`.
//!
//! Used as a serde `with` module on every `created_at`/`updated_at` field.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current UTC time truncated to microseconds so values survive a database round trip unchanged.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&dt.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, PARSE_FORMAT).map_err(de::Error::custom)
}
