//! Request body encoding for the predict endpoint.

use url::form_urlencoded;

/// Name of the single form field the service reads.
pub const SUMMARY_FIELD: &str = "Summary";

/// Content type of the request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encode `summary` as the form body `Summary=<value>`.
///
/// Uses the same serializer rules as browser `URLSearchParams` (spaces become
/// `+`, reserved characters are percent-encoded). The value is sent as typed;
/// no trimming or length checks happen here.
pub fn encode_summary(summary: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(SUMMARY_FIELD, summary)
        .finish()
}
