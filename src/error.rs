// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// A single GET that did not produce a usable response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to fetch {url}: {message}")]
pub struct FetchError {
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            message: cause.to_string(),
        }
    }
}

/// A required element was not present in the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Tag not found: <{tag}> {filter}")]
pub struct LookupError {
    /// Requested tag name
    pub tag: String,
    /// Rendered attribute filter, `{}` when unfiltered
    pub filter: String,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a raw request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Page could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Required element lookup failed
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regular expression failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Preview code missing from the status expectation table
    #[error("Unknown preview code '{code}' for {link}")]
    UnknownPreviewCode { code: String, link: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
