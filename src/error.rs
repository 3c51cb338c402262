use thiserror::Error;

/// Failure reading or writing one of the JSON store files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("invalid time format '{0}' (expected H:MM AM/PM)")]
    InvalidTimeFormat(String),
}

/// Failure of an external lookup collaborator (search or generation).
///
/// Never shown to the user; the resolver treats every variant as
/// "fall through to the next cascade stage".
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("upstream timed out")]
    Timeout,
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("could not parse upstream response: {0}")]
    Parse(String),
    #[error("upstream returned no content")]
    Empty,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("could not open {target}: {reason}")]
    Launch { target: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}
