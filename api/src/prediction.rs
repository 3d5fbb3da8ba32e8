//! The prediction response and the confidence → bar width conversion.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ApiError, ConfidenceError};

/// Placeholder shown for a key the service left out (or sent as `null`).
pub const MISSING_VALUE: &str = "—";

/// One prediction as returned by `POST /predict`.
///
/// Every field is kept as display text. The service formats the numbers
/// itself (`"87.50%"`), but plain JSON numbers are accepted too so a backend
/// that sends `82.3` instead of `"82.3"` still renders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "Status", default, deserialize_with = "display_text")]
    pub status: Option<String>,
    #[serde(rename = "Confidence", default, deserialize_with = "display_text")]
    pub confidence: Option<String>,
    #[serde(rename = "Valid_Percentage", default, deserialize_with = "display_text")]
    pub valid_percentage: Option<String>,
    #[serde(
        rename = "Invalid_Percentage",
        default,
        deserialize_with = "display_text"
    )]
    pub invalid_percentage: Option<String>,
}

impl PredictionResult {
    /// Decode a response body. Only a JSON object is a prediction; serde
    /// would otherwise fill the struct positionally from an array.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(serde_json::from_value(Value::Object(map))?),
            other => Err(ApiError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn confidence_text(&self) -> &str {
        self.confidence.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn valid_text(&self) -> &str {
        self.valid_percentage.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn invalid_text(&self) -> &str {
        self.invalid_percentage.as_deref().unwrap_or(MISSING_VALUE)
    }

    /// Numeric confidence in `[0, 100]`, used to size the progress bar.
    pub fn confidence_percent(&self) -> Result<f64, ConfidenceError> {
        let raw = self.confidence.as_deref().ok_or(ConfidenceError::Missing)?;
        parse_confidence(raw)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a `"<number>%"` confidence string into its numeric percentage.
///
/// A single trailing `%` is optional. Anything that is not a finite number in
/// `[0, 100]` is rejected rather than producing a bogus width.
pub fn parse_confidence(raw: &str) -> Result<f64, ConfidenceError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if number.is_empty() {
        return Err(ConfidenceError::Empty);
    }

    let value: f64 = number
        .parse()
        .map_err(|_| ConfidenceError::NotANumber(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ConfidenceError::NotANumber(raw.to_string()));
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfidenceError::OutOfRange(value));
    }

    // "-0%" parses to -0.0, which would print as "-0".
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// CSS width for a confidence percentage, e.g. `82.3` → `"82.3%"`.
pub fn bar_width(percent: f64) -> String {
    format!("{percent}%")
}

fn display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
