//! Application configuration
//!
//! The API base URL comes from `ASSET_TREE_API_BASE_URL`, falling back to the
//! public demo API when the variable is unset or empty.

use url::Url;

use crate::error::ConfigError;

pub const API_BASE_URL_KEY: &str = "ASSET_TREE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "https://fake-api.tractian.com";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: Url,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup (for tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_BASE_URL_KEY)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let invalid = |source| ConfigError::InvalidUrl {
            key: API_BASE_URL_KEY.to_string(),
            value: raw.clone(),
            source,
        };

        let api_base_url = Url::parse(raw.trim()).map_err(invalid)?;
        // Endpoint paths are appended to the base, which needs a hierarchical path
        if api_base_url.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self { api_base_url })
    }

    /// `GET /companies`
    pub fn companies_url(&self) -> Url {
        self.endpoint(&["companies"])
    }

    /// `GET /companies/{id}/locations`
    pub fn locations_url(&self, company_id: &str) -> Result<Url, ConfigError> {
        Ok(self.endpoint(&["companies", checked_segment(company_id)?, "locations"]))
    }

    /// `GET /companies/{id}/assets`
    pub fn assets_url(&self, company_id: &str) -> Result<Url, ConfigError> {
        Ok(self.endpoint(&["companies", checked_segment(company_id)?, "assets"]))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn checked_segment(company_id: &str) -> Result<&str, ConfigError> {
    let trimmed = company_id.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(ConfigError::InvalidCompanyId(company_id.to_string()));
    }
    Ok(trimmed)
}
