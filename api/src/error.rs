use thiserror::Error;

/// Failures decoding a prediction response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("prediction response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("prediction response is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Reasons a `Confidence` value cannot size the progress bar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfidenceError {
    #[error("response has no Confidence value")]
    Missing,
    #[error("Confidence value is empty")]
    Empty,
    #[error("Confidence value `{0}` is not a number")]
    NotANumber(String),
    #[error("Confidence value {0} is outside 0–100")]
    OutOfRange(f64),
}
