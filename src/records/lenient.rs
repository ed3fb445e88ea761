//! Field-level deserializers for legacy trip data.
//!
//! Rows written by older versions of the app (or edited by hand in a
//! spreadsheet export) carry numbers as strings, voter lists as comma-joined
//! text and free-form status labels. Defaults are applied here, at the
//! deserialization boundary, so the scoring engine only ever sees typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Enums that are stored as free-form labels.
///
/// `from_label` must be total: unknown text maps to some variant rather than
/// failing the whole document.
pub trait FromLabel: Default {
    fn from_label(label: &str) -> Self;
}

/// Number field: JSON number, numeric string, or null. Unparseable input is 0.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_number).unwrap_or(0.0))
}

/// Largest cash amount (stake or payout) accepted from stored data.
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Cash field: like [`number`], but negative or implausibly large amounts are
/// treated as malformed and read as 0.
pub fn money<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = number(deserializer)?;
    if (0.0..=MAX_AMOUNT).contains(&amount) {
        Ok(amount)
    } else {
        tracing::warn!(amount, "cash amount out of range, treating as 0");
        Ok(0.0)
    }
}

/// Non-negative integer field (counts, odds, race numbers). Fractions are
/// truncated and negatives clamp to 0.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = number(deserializer)?;
    Ok(if n <= 0.0 {
        0
    } else if n >= u32::MAX as f64 {
        u32::MAX
    } else {
        n as u32
    })
}

fn parse_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            tracing::warn!(%value, "malformed numeric field, treating as 0");
            0.0
        }
    }
}

/// Name list: a JSON array of strings or a single comma-separated string.
/// Blank entries are dropped.
pub fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let names = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(joined)) => split_names(&joined),
        _ => Vec::new(),
    };
    Ok(names)
}

fn split_names(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Label field for enums implementing [`FromLabel`]. Missing or non-string
/// values give the enum's default.
pub fn label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromLabel,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => T::from_label(&s),
        _ => T::default(),
    })
}

/// Timestamp field: RFC 3339, or a naive ISO datetime taken as UTC.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .ok()
}

/// Calendar day field (`YYYY-MM-DD`). A full timestamp is accepted and cut
/// down to its date.
pub fn day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_day))
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
