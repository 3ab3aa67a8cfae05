//! The `[[OriginalSource]]` / `[[OriginalFlags]]` slots of RegExp objects.

use crate::error::{EngineError, EngineResult};

/// Flags recognised by the language, in canonical `flags` getter order.
pub const KNOWN_FLAGS: &str = "dgimsuvy";

/// A regular-expression literal as written: pattern source plus flags.
///
/// The pattern is never compiled; the inspector only needs its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsRegExp {
    source: String,
    flags: String,
}

impl JsRegExp {
    /// Creates a RegExp slot pair.  Neither part is validated here.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    /// Returns the source text exactly as stored.
    pub fn raw_source(&self) -> &str {
        &self.source
    }

    /// Returns the flags exactly as stored.
    pub fn raw_flags(&self) -> &str {
        &self.flags
    }

    /// `RegExp.prototype.source` (§22.2.6.13): the pattern escaped so that it
    /// can be re-read as a literal.  The empty pattern becomes `(?:)`.
    pub fn source(&self) -> String {
        if self.source.is_empty() {
            return "(?:)".to_string();
        }
        let mut out = String::with_capacity(self.source.len());
        let mut escaped = false;
        let mut in_class = false;
        for c in self.source.chars() {
            match c {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                '/' if !escaped && !in_class => out.push_str("\\/"),
                _ => out.push(c),
            }
            if !escaped {
                match c {
                    '[' => in_class = true,
                    ']' => in_class = false,
                    _ => {}
                }
            }
            escaped = c == '\\' && !escaped;
        }
        out
    }

    /// Validates the stored flags, returning them in canonical order.
    ///
    /// Unknown or repeated flags, or `u` combined with `v`, are a
    /// `SyntaxError`, as they would be for `new RegExp(src, flags)`.
    pub fn flags(&self) -> EngineResult<String> {
        let mut seen = [false; KNOWN_FLAGS.len()];
        for c in self.flags.chars() {
            let Some(pos) = KNOWN_FLAGS.find(c) else {
                return Err(EngineError::SyntaxError(format!(
                    "Invalid regular expression flags '{}'",
                    self.flags
                )));
            };
            if seen[pos] {
                return Err(EngineError::SyntaxError(format!(
                    "Duplicate regular expression flag '{c}'"
                )));
            }
            seen[pos] = true;
        }
        if self.flags.contains('u') && self.flags.contains('v') {
            return Err(EngineError::SyntaxError(
                "Regular expression flags 'u' and 'v' are exclusive".to_string(),
            ));
        }
        Ok(KNOWN_FLAGS
            .chars()
            .zip(seen)
            .filter_map(|(c, on)| on.then_some(c))
            .collect())
    }

    /// `RegExp.prototype.toString` (§22.2.6.17): `/<source>/<flags>`.
    pub fn to_pattern_string(&self) -> EngineResult<String> {
        Ok(format!("/{}/{}", self.source(), self.flags()?))
    }
}
