use thiserror::Error;

/// Failure taxonomy for model construction and evaluation.
///
/// Every failure is synchronous and local to the call that raised it.
/// Nothing is retried or absorbed inside the crate.
#[derive(Error, Debug)]
pub enum MdpError {
    /// Malformed input: mismatched lengths, negative weights,
    /// distributions that do not sum to one.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation undefined for the current values, e.g. normalizing zero mass.
    #[error("domain error: {0}")]
    Domain(String),

    /// Index outside the valid range of a container.
    #[error("{what} index {index} out of range for length {len}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Operation requires state that is absent, e.g. evaluating an action with no outcomes.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Malformed JSON input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MdpError {
    pub fn invalid(message: impl Into<String>) -> Self {
        MdpError::InvalidArgument(message.into())
    }
    pub fn domain(message: impl Into<String>) -> Self {
        MdpError::Domain(message.into())
    }
    pub fn range(what: &'static str, index: usize, len: usize) -> Self {
        MdpError::OutOfRange { what, index, len }
    }
    pub fn precondition(message: impl Into<String>) -> Self {
        MdpError::Precondition(message.into())
    }
}
