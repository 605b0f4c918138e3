//! Error types for the tinct color engine.
//!
//! Only programmer errors surface here: wrong argument kinds, malformed
//! grammar, and out-of-domain values. "Soft" invalidity (unknown keyword,
//! unresolvable var() or dimension, disallowed relative channel) is not an
//! error; those resolve to `None` at the call site, matching CSS's rule that
//! an invalid value must not halt resolution.

use thiserror::Error;

/// Top-level error type for all tinct operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// The argument was the wrong kind of thing entirely.
    #[error("expected {expected}, got {found}")]
    Type { expected: String, found: String },

    /// The input failed its grammar; carries the offending literal.
    #[error("invalid color syntax: {literal}")]
    Syntax { literal: String },

    /// A numeric or option value was outside its valid domain.
    #[error("{what} out of range: {value}")]
    Range { what: String, value: String },
}

impl ColorError {
    pub fn syntax(literal: impl Into<String>) -> Self {
        ColorError::Syntax {
            literal: literal.into(),
        }
    }

    pub fn type_error(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ColorError::Type {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn range(what: impl Into<String>, value: impl Into<String>) -> Self {
        ColorError::Range {
            what: what.into(),
            value: value.into(),
        }
    }
}
