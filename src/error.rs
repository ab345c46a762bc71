use thiserror::Error;

/// Errors raised by the cleanup utilities.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("missing required environment variable `{0}`")]
    MissingConfig(&'static str),

    #[error("invalid value `{value}` for `{var}`: {reason}")]
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("malformed input `{input}`: {reason}")]
    MalformedInput { input: String, reason: &'static str },

    #[error("prefix `{prefix}` carries unparseable timestamp `{value}`")]
    Timestamp {
        prefix: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("retention window of {span} {unit} is out of range")]
    WindowOutOfRange { span: u64, unit: &'static str },

    #[error("object store request failed: {0}")]
    Store(#[from] aws_sdk_s3::Error),
}

impl CleanupError {
    pub(crate) fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = CleanupError> = std::result::Result<T, E>;
