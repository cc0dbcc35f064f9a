//! Entity feeds - decoding payloads and tracking their load state
//!
//! Locations and assets arrive as two independent JSON arrays per company.
//! Fetching them is somebody else's job; this module decodes the payloads and
//! models where each feed stands so the tree is only built once both arrived.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::FeedError;
use crate::tree::{Asset, Location};

// =============================================================================
// DECODING
// =============================================================================

/// Decode a locations payload (`[{id, name, parentId}]`)
pub fn parse_locations(json: &str) -> Result<Vec<Location>, FeedError> {
    let locations: Vec<Location> = serde_json::from_str(json)?;
    debug!(count = locations.len(), "decoded locations");
    Ok(locations)
}

/// Decode an assets payload. Records carrying a `sensorType` become components.
pub fn parse_assets(json: &str) -> Result<Vec<Asset>, FeedError> {
    let assets: Vec<Asset> = serde_json::from_str(json)?;
    debug!(
        count = assets.len(),
        components = assets.iter().filter(|a| a.is_component()).count(),
        "decoded assets"
    );
    Ok(assets)
}

fn read_file(path: &Path) -> Result<String, FeedError> {
    std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_locations(path: impl AsRef<Path>) -> Result<Vec<Location>, FeedError> {
    parse_locations(&read_file(path.as_ref())?)
}

pub fn load_assets(path: impl AsRef<Path>) -> Result<Vec<Asset>, FeedError> {
    parse_assets(&read_file(path.as_ref())?)
}

/// Load both feeds of one company snapshot
pub fn load_snapshot(
    locations: impl AsRef<Path>,
    assets: impl AsRef<Path>,
) -> crate::Result<(Vec<Location>, Vec<Asset>)> {
    Ok((load_locations(locations)?, load_assets(assets)?))
}

// =============================================================================
// FETCH ERRORS
// =============================================================================

/// A failed upstream request as reported by the fetching layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchError {
    /// Transport-level message (network down, timeout...)
    pub message: Option<String>,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Response body, string or JSON
    pub body: Option<Value>,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn http(status: u16, body: Option<Value>) -> Self {
        Self {
            status: Some(status),
            body,
            ..Default::default()
        }
    }
}

/// Best human-readable message for a failed fetch.
///
/// Explicit message, then a string body, then the body's `message` field,
/// then the status code, then a generic fallback.
pub fn extract_error_message(error: &FetchError) -> String {
    if let Some(message) = &error.message {
        return message.clone();
    }

    if let Some(status) = error.status {
        match &error.body {
            Some(Value::String(body)) => return body.clone(),
            Some(Value::Object(map)) => {
                if let Some(Value::String(message)) = map.get("message") {
                    return message.clone();
                }
            }
            _ => {}
        }
        return format!("Error loading data ({})", status);
    }

    "Unknown error".to_string()
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&extract_error_message(self))
    }
}

impl std::error::Error for FetchError {}

// =============================================================================
// FEED STATE
// =============================================================================

/// Where a single feed stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(FetchError),
}

impl<T> FeedState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FeedState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FeedState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FeedState<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => FeedState::Loaded(data),
            Err(error) => FeedState::Failed(error),
        }
    }
}
