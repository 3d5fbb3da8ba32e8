//! Wire contract between Bugsift clients and the defect prediction service.
//!
//! The service exposes a single endpoint: `POST /predict` with a form-encoded
//! `Summary` field, answering with a small JSON object. Everything the clients
//! need to speak that contract lives here so the UI crate never hand-builds
//! request bodies or pokes at raw JSON.

mod error;
mod form;
mod prediction;

pub use error::{ApiError, ConfidenceError};
pub use form::{encode_summary, FORM_CONTENT_TYPE, SUMMARY_FIELD};
pub use prediction::{bar_width, parse_confidence, PredictionResult, MISSING_VALUE};

/// Path of the prediction endpoint, relative to the service origin.
pub const PREDICT_PATH: &str = "/predict";
