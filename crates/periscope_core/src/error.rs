//! Error types for the Periscope object model.

use thiserror::Error;

/// Every failure the object model can raise while evaluating a value.
///
/// These mirror the exception kinds a script would observe.  The inspector
/// never lets one escape: a failing getter, for instance, is rendered as the
/// text returned by [`EngineError::message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A JavaScript TypeError was raised.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A JavaScript RangeError was raised.
    #[error("RangeError: {0}")]
    RangeError(String),

    /// A JavaScript SyntaxError was raised.
    #[error("SyntaxError: {0}")]
    SyntaxError(String),

    /// A plain `Error` thrown by user or native code.
    #[error("Error: {0}")]
    Thrown(String),

    /// An internal engine error that should not occur in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns the bare message, without the error-kind prefix.
    ///
    /// This is what a script reads from `error.message`.
    pub fn message(&self) -> &str {
        match self {
            Self::TypeError(msg)
            | Self::RangeError(msg)
            | Self::SyntaxError(msg)
            | Self::Thrown(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Returns the constructor name a script would see for this error.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TypeError(_) => "TypeError",
            Self::RangeError(_) => "RangeError",
            Self::SyntaxError(_) => "SyntaxError",
            Self::Thrown(_) | Self::Internal(_) => "Error",
        }
    }
}

/// Convenient `Result` alias for fallible object-model operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_kind_prefix() {
        let err = EngineError::Thrown("boom".to_string());
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "Error: boom");
    }

    #[test]
    fn test_type_error_display_and_name() {
        let err = EngineError::TypeError("not a function".to_string());
        assert_eq!(err.to_string(), "TypeError: not a function");
        assert_eq!(err.name(), "TypeError");
        assert_eq!(err.message(), "not a function");
    }
}
