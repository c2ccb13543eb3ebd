// src/error.rs

//! Unified error handling for the downloader.

use std::fmt;

use thiserror::Error;

/// Result type alias for downloader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The identifier or URL does not name a collection
    #[error(
        "Cannot infer icon-set prefix from '{0}'. Use a prefix like 'fluent' or a set URL such as 'https://icon-sets.iconify.design/fluent/'."
    )]
    InvalidInput(String),

    /// The primary service does not know the collection
    #[error("Iconify API: unknown prefix '{0}'")]
    UnknownCollection(String),

    /// A listing document had an unexpected shape
    #[error("Unexpected JSON structure from {source_name}: {message}")]
    MalformedResponse {
        source_name: String,
        message: String,
    },

    /// The listing resolved but contained no icons
    #[error("No icons found for prefix '{0}' (API/mirror/local JSON empty).")]
    EmptyListing(String),

    /// Filters removed every icon
    #[error("Filters removed all icons. Try adjusting --include/--exclude/--contains.")]
    NoItemsRemain,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Zip archive could not be written
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid-input error for the given raw identifier.
    pub fn invalid_input(input: impl Into<String>) -> Self {
        Self::InvalidInput(input.into())
    }

    /// Create a malformed-response error with the offending source.
    pub fn malformed(source_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MalformedResponse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure was caused by the caller's input rather than
    /// the network or the filesystem.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::UnknownCollection(_)
                | Self::MalformedResponse { .. }
                | Self::EmptyListing(_)
                | Self::NoItemsRemain
                | Self::Url(_)
                | Self::Validation(_)
        )
    }

    /// Process exit code for this error.
    ///
    /// Usage-layer failures exit with 2, HTTP-layer failures with 3 and
    /// everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            e if e.is_usage() => 2,
            Self::Http(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(AppError::invalid_input("a b").exit_code(), 2);
        assert_eq!(AppError::NoItemsRemain.exit_code(), 2);
        assert_eq!(AppError::malformed("mirror", "icons missing").exit_code(), 2);
        assert_eq!(AppError::UnknownCollection("nope".into()).exit_code(), 2);
        assert_eq!(AppError::validation("concurrency").exit_code(), 2);
    }

    #[test]
    fn url_parse_errors_are_usage_errors() {
        let err = AppError::from(url::Url::parse("::nope").unwrap_err());
        assert!(err.is_usage());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn io_errors_exit_with_one() {
        let err = AppError::from(std::io::Error::other("disk full"));
        assert!(!err.is_usage());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_input_message_names_the_input() {
        let message = AppError::invalid_input("bad prefix").to_string();
        assert!(message.contains("'bad prefix'"));
        assert!(message.contains("fluent"));
    }
}
