//! Error types for schema loading and settings processing.

use thiserror::Error;

/// Errors raised while loading a keyword schema resource.
///
/// Schema loading happens once at startup and these are the only hard
/// failures in the crate; everything downstream is per-line and fail-soft.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema resource could not be read.
    #[error("failed to read keyword schema: {0}")]
    Unreadable(#[from] std::io::Error),

    /// The resource is not a valid JSON object of `keyword: tag` pairs.
    #[error("failed to parse keyword schema: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A keyword name does not match `[A-Z][A-Za-z0-9_]*`.
    #[error("invalid keyword name '{0}' in schema")]
    InvalidName(String),
}

/// Errors raised while reading or writing individual settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The line does not have the `KEY = value` shape.
    #[error("'{0}' is not a valid setting")]
    MalformedLine(String),

    /// The keyword is absent from the schema.
    #[error("unknown keyword {0}")]
    UnknownKeyword(String),

    /// Numeric text under a `float` or `array` tag failed to parse.
    #[error("invalid value '{value}' for {key}: {source}")]
    InvalidFloat {
        /// Keyword whose value was being coerced.
        key: String,
        /// The offending token.
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Numeric text under an `int` or `bool` tag failed to parse.
    #[error("invalid value '{value}' for {key}: {source}")]
    InvalidInt {
        /// Keyword whose value was being coerced.
        key: String,
        /// The offending token.
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A value's variant disagrees with the keyword's schema tag.
    #[error("value for {key} is {found}, schema expects {expected}")]
    TypeMismatch {
        /// Keyword being assigned.
        key: String,
        /// The schema tag for the keyword.
        expected: String,
        /// The variant actually supplied.
        found: String,
    },
}
