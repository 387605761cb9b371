use reqwest::StatusCode;
use thiserror::Error;

pub const NO_RESULTS_MESSAGE: &str = "No results found.";

pub const USAGE_MESSAGE: &str = "Number of arguments is invalid.\nUsage: imgsearch \"query\"";

/// A single metadata payload that could not be turned into a record.
#[derive(Debug, Error)]
#[error("malformed metadata payload: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Everything that can end a lookup early.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{}", USAGE_MESSAGE)]
    Usage,

    #[error("{0}")]
    Arguments(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("search endpoint returned {status}")]
    Http { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", NO_RESULTS_MESSAGE)]
    NoResults,

    #[error("result {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    /// Text placed inside the `<Error>` element. HTTP failures surface the
    /// response body untouched, everything else its display form.
    pub fn document_message(&self) -> String {
        match self {
            LookupError::Http { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            LookupError::Io(_) => 1,
            LookupError::Usage | LookupError::Arguments(_) => 2,
            LookupError::Config(_) => 3,
            LookupError::Http { .. } => 4,
            LookupError::Transport(_) => 5,
            LookupError::NoResults => 6,
            LookupError::Decode { .. } => 7,
        }
    }
}
