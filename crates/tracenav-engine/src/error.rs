use thiserror::Error;

/// Errors raised by the trace engine.
///
/// Only configuration problems are hard failures; everything else degrades to
/// an empty or absent result at the point it is detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Setting '{0}' is undefined")]
    MissingSetting(String),

    #[error("No active editor")]
    NoActiveDocument,
}

impl TraceError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        TraceError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}
