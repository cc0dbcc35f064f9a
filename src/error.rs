//! Error types for the asset tree crate
//!
//! The tree core never fails; these errors cover the edges around it:
//! decoding entity feeds and reading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum AssetTreeError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors decoding location/asset payloads
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL in {key}: '{value}' ({source})")]
    InvalidUrl {
        key: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Company id '{0}' cannot be used in a URL path")]
    InvalidCompanyId(String),
}

pub type Result<T> = std::result::Result<T, AssetTreeError>;
