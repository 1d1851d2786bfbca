use thiserror::Error;

/// Everything that can go wrong between reading the flags and printing the report. Each variant
/// corresponds to the stage that produced it.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A date flag was missing, malformed, or the range was backwards.
    #[error("invalid date: {0}")]
    Parse(String),
    /// The request never got a successful response.
    #[error("failed to fetch completed items: {0}")]
    Fetch(String),
    /// The response body wasn't the JSON document we expect.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// A record inside the response had missing fields or fields of the wrong type.
    #[error("unexpected record shape: {0}")]
    Shape(String),
}
