use thiserror::Error;

/// Everything that can go wrong inside one poll cycle.
/// All variants are recoverable: the loop reports them and keeps polling.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Network-level failure talking to the review API, including a body
    /// that would not decode as JSON.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but not with 200.
    #[error("endpoint [{url}] is unavailable, API replied {status}")]
    Endpoint { url: String, status: u16 },

    /// The payload carried the wrong type where the API documents another.
    #[error("malformed response: {0}")]
    Shape(String),

    /// The payload was missing an expected key, or the status value is not
    /// one the API documents. An upstream contract violation, not a type
    /// mismatch.
    #[error("empty or incomplete response: {0}")]
    EmptyResponse(String),
}

/// Fatal startup failure: a required environment variable is absent.
/// The poll loop must never start behind this.
#[derive(Debug, Error)]
#[error("required environment variables are missing")]
pub struct TokenError;
