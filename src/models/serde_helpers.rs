//! Lenient deserializers for backend payloads.
//!
//! The backend returns DECIMAL columns as strings, leaves unset columns as
//! `null` and sends DATE columns either as `YYYY-MM-DD` or as full timestamps.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// `null` becomes `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `12.5`, `"12.50"`, `""` and `null`; the last two read as zero.
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flexible_opt_f64(deserializer)?.unwrap_or(0.0))
}

/// Like `flexible_f64` but keeps `""` and `null` apart from zero.
pub fn flexible_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {}", s))),
        None => Ok(None),
    }
}

/// Reads the leading `YYYY-MM-DD` of a date or timestamp string.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid date: {}", raw)))
}

/// A JSON array, or a string holding a JSON array (how the settings form
/// submits it), or `null`.
pub fn list_or_json_string<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString<T> {
        List(Vec<T>),
        Text(String),
    }

    match Option::<ListOrString<T>>::deserialize(deserializer)? {
        Some(ListOrString::List(items)) => Ok(items),
        Some(ListOrString::Text(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(ListOrString::Text(s)) => serde_json::from_str(&s).map_err(D::Error::custom),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "flexible_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "flexible_date")]
        date: Option<NaiveDate>,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        assert_eq!(sample(json!({ "amount": "1250.75" })).amount, 1250.75);
        assert_eq!(sample(json!({ "amount": 3 })).amount, 3.0);
        assert_eq!(sample(json!({ "amount": null })).amount, 0.0);
        assert_eq!(sample(json!({ "amount": "" })).amount, 0.0);
        assert_eq!(sample(json!({})).amount, 0.0);
    }

    #[test]
    fn optional_numbers_keep_blanks_apart() {
        #[derive(Deserialize)]
        struct Rate {
            #[serde(default, deserialize_with = "flexible_opt_f64")]
            value: Option<f64>,
        }
        let read = |v| serde_json::from_value::<Rate>(v).unwrap().value;
        assert_eq!(read(json!({ "value": "0" })), Some(0.0));
        assert_eq!(read(json!({ "value": "" })), None);
        assert_eq!(read(json!({ "value": null })), None);
    }

    #[test]
    fn garbage_number_is_rejected() {
        let result: Result<Sample, _> = serde_json::from_value(json!({ "amount": "abc" }));
        assert!(result.is_err());
    }

    #[test]
    fn null_strings_become_empty() {
        assert_eq!(sample(json!({ "name": null })).name, "");
        assert_eq!(sample(json!({ "name": "Acme" })).name, "Acme");
    }

    #[test]
    fn dates_accept_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(sample(json!({ "date": "2024-03-09" })).date, expected);
        assert_eq!(sample(json!({ "date": "2024-03-09T00:00:00.000Z" })).date, expected);
        assert_eq!(sample(json!({ "date": null })).date, None);
    }
}
