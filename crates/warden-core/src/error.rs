//! Construction-time error types.
//!
//! Everything here fires while a middleware or resolver is being built,
//! before any request is served. Per-request failures never produce errors;
//! they collapse to [`crate::Identity::Anonymous`].

use thiserror::Error;

/// Errors raised while building a middleware, pattern, or resolver.
///
/// A misconfigured pipeline must never reach production half-working, so
/// builders validate everything up front and return this instead of
/// deferring to request time.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required builder parameter was never set.
    #[error("missing required parameter: {name}")]
    MissingParameter {
        /// The parameter name.
        name: String,
    },

    /// A parameter was set to an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// What made the value unusable.
        reason: String,
    },

    /// A token pattern failed to compile.
    #[error("invalid token pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Key material for signed-token verification could not be parsed.
    #[error("invalid verification key: {reason}")]
    InvalidKey {
        /// Explanation of the key problem.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a missing-parameter error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates an invalid-parameter error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-pattern error from a failed compile.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates an invalid-key error.
    #[must_use]
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parameter() {
        let err = ConfigError::missing("resolver");
        assert_eq!(err.to_string(), "missing required parameter: resolver");

        let err = ConfigError::invalid("keyword", "must not be empty");
        assert_eq!(err.to_string(), "invalid value for keyword: must not be empty");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        use std::error::Error as _;

        let source = regex::Regex::new("(").expect_err("pattern should not compile");
        let err = ConfigError::invalid_pattern("(", source);
        assert!(err.to_string().contains("invalid token pattern `(`"));
        assert!(err.source().is_some());
    }
}
