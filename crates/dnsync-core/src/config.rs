//! Configuration types for the DNSync system
//!
//! The surrounding process loads credentials and flags however it likes and
//! hands the result to a provider factory as a [`ProviderConfig`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of items requested per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default HTTP timeout for API requests (in seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest page size the listing endpoints accept
pub const MAX_PAGE_SIZE: u32 = 1000;

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Hetzner DNS provider
    Hetzner {
        /// API token, sent as a header on every request
        api_token: String,

        /// Override for the API base URL (tests, proxies)
        #[serde(default)]
        api_url: Option<String>,

        /// Log mutations instead of issuing them
        #[serde(default)]
        dry_run: bool,

        /// Items requested per listing page
        #[serde(default = "default_page_size")]
        page_size: u32,

        /// Per-request timeout (in seconds)
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Create a Hetzner configuration with default settings
    pub fn hetzner(api_token: impl Into<String>) -> Self {
        ProviderConfig::Hetzner {
            api_token: api_token.into(),
            api_url: None,
            dry_run: false,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Hetzner {
                api_token,
                api_url,
                page_size,
                timeout_secs,
                ..
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Hetzner API token cannot be empty"));
                }
                if *page_size == 0 || *page_size > MAX_PAGE_SIZE {
                    return Err(crate::Error::config(format!(
                        "Page size must be between 1 and {}, got {}",
                        MAX_PAGE_SIZE, page_size
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("HTTP timeout must be > 0"));
                }
                if let Some(url) = api_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "API URL must use HTTP or HTTPS scheme, got: {}",
                        url
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Hetzner { .. } => "hetzner",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }

    /// Whether mutations should only be logged
    pub fn dry_run(&self) -> bool {
        match self {
            ProviderConfig::Hetzner { dry_run, .. } => *dry_run,
            ProviderConfig::Custom { .. } => false,
        }
    }
}

// Keeps the API token out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Hetzner {
                api_url,
                dry_run,
                page_size,
                timeout_secs,
                ..
            } => f
                .debug_struct("Hetzner")
                .field("api_token", &"<REDACTED>")
                .field("api_url", api_url)
                .field("dry_run", dry_run)
                .field("page_size", page_size)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<REDACTED>")
                .finish(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hetzner_defaults_from_json() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"type": "hetzner", "api_token": "abc"}"#).unwrap();

        match config {
            ProviderConfig::Hetzner {
                ref api_token,
                ref api_url,
                dry_run,
                page_size,
                timeout_secs,
            } => {
                assert_eq!(api_token, "abc");
                assert!(api_url.is_none());
                assert!(!dry_run);
                assert_eq!(page_size, DEFAULT_PAGE_SIZE);
                assert_eq!(timeout_secs, DEFAULT_TIMEOUT_SECS);
            }
            _ => panic!("expected hetzner config"),
        }
        assert_eq!(config.type_name(), "hetzner");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(ProviderConfig::hetzner("").validate().is_err());

        let mut config = ProviderConfig::hetzner("token");
        if let ProviderConfig::Hetzner { page_size, .. } = &mut config {
            *page_size = 0;
        }
        assert!(config.validate().is_err());

        let mut config = ProviderConfig::hetzner("token");
        if let ProviderConfig::Hetzner { api_url, .. } = &mut config {
            *api_url = Some("ftp://dns.example".to_string());
        }
        assert!(config.validate().is_err());

        let custom = ProviderConfig::Custom {
            factory: String::new(),
            config: serde_json::json!({}),
        };
        assert!(custom.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ProviderConfig::hetzner("super-secret-token");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("<REDACTED>"));
    }
}
