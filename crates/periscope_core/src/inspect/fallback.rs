//! Display fallbacks.
//!
//! Every fallible step of label production returns
//! `Result<String, DisplayFallback>`; the error's `Display` text is the
//! placeholder shown in place of the value.

use thiserror::Error;

/// A display step failed; render the placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayFallback {
    /// Type-name resolution failed.
    #[error("Object")]
    Object,

    /// The date's time value is unrepresentable.
    #[error("Invalid Date")]
    InvalidDate,

    /// The pattern's flags are malformed.
    #[error("/invalid_regex/")]
    InvalidRegex,

    /// A property key could not be turned into text.
    #[error("[UnsafeKey]")]
    UnsafeKey,
}

/// Unwraps a display step, substituting the fallback text on failure.
pub fn or_fallback(result: Result<String, DisplayFallback>) -> String {
    result.unwrap_or_else(|fallback| {
        tracing::debug!(%fallback, "display fallback");
        fallback.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_texts() {
        assert_eq!(DisplayFallback::Object.to_string(), "Object");
        assert_eq!(DisplayFallback::InvalidDate.to_string(), "Invalid Date");
        assert_eq!(DisplayFallback::InvalidRegex.to_string(), "/invalid_regex/");
        assert_eq!(DisplayFallback::UnsafeKey.to_string(), "[UnsafeKey]");
    }

    #[test]
    fn test_or_fallback() {
        assert_eq!(or_fallback(Ok("x".to_string())), "x");
        assert_eq!(or_fallback(Err(DisplayFallback::InvalidDate)), "Invalid Date");
    }
}
