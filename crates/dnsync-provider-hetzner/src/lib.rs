// # Hetzner DNS Provider
//
// This crate provides a Hetzner DNS provider implementation for the DNSync
// system.
//
// ## Implementation Status
//
// - ✅ Full pagination of zone and record listings
// - ✅ Deletion by record ID (`DELETE /records/:id`)
// - ✅ Creation in the longest-suffix zone with a zone-relative name
// - ✅ Created record IDs returned to the caller
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (owned by the caller, which reruns the whole pass)
// - ❌ NO caching (every pass reads provider state in full)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Hetzner DNS API v1: https://dns.hetzner.com/api-docs

mod client;
mod models;

pub use client::{HETZNER_API_BASE, HetznerClient};

use async_trait::async_trait;
use dnsync_core::config::ProviderConfig;
use dnsync_core::traits::{DnsProvider, DnsProviderFactory};
use dnsync_core::{Changes, Endpoint, Error, Reconciler, Result};
use std::time::Duration;

/// Hetzner DNS provider
///
/// Binds the provider-agnostic [`Reconciler`] to a [`HetznerClient`].
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone and record listings)
/// - Log every create/delete it would issue
/// - **NOT** actually modify DNS records
pub struct HetznerProvider {
    reconciler: Reconciler<HetznerClient>,
}

impl std::fmt::Debug for HetznerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerProvider")
            .field("client", self.reconciler.gateway())
            .field("dry_run", &self.reconciler.is_dry_run())
            .finish()
    }
}

impl HetznerProvider {
    /// Create a provider from an existing client
    pub fn new(client: HetznerClient, dry_run: bool) -> Self {
        Self {
            reconciler: Reconciler::new(client, dry_run),
        }
    }

    /// Create a provider against the public API (live mode)
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Ok(Self::new(HetznerClient::new(api_token)?, false))
    }

    /// Create a provider against the public API (dry-run mode)
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Ok(Self::new(HetznerClient::new(api_token)?, true))
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Hetzner {
                api_token,
                api_url,
                dry_run,
                page_size,
                timeout_secs,
            } => {
                let client = HetznerClient::with_settings(
                    api_token.clone(),
                    api_url.as_deref().unwrap_or(HETZNER_API_BASE),
                    *page_size,
                    Duration::from_secs(*timeout_secs),
                )?;
                Ok(Self::new(client, *dry_run))
            }
            _ => Err(Error::config("Invalid config for Hetzner provider")),
        }
    }

    pub fn reconciler(&self) -> &Reconciler<HetznerClient> {
        &self.reconciler
    }
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        self.reconciler.list_endpoints().await
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<()> {
        self.reconciler.apply(changes).await
    }

    fn provider_name(&self) -> &'static str {
        "hetzner"
    }
}

/// Factory for creating Hetzner providers
pub struct HetznerFactory;

impl DnsProviderFactory for HetznerFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        config.validate()?;

        if config.dry_run() {
            tracing::warn!("Hetzner provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(HetznerProvider::from_config(config)?))
    }
}

/// Register the Hetzner provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dnsync_provider_hetzner::register(&registry);
/// assert!(registry.has_provider("hetzner"));
/// ```
pub fn register(registry: &dnsync_core::ProviderRegistry) {
    registry.register_provider("hetzner", Box::new(HetznerFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creation() {
        let provider = HetznerFactory.create(&ProviderConfig::hetzner("test_token"));
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "hetzner");
    }

    #[test]
    fn test_factory_missing_token() {
        assert!(HetznerFactory.create(&ProviderConfig::hetzner("")).is_err());
    }

    #[test]
    fn test_factory_rejects_foreign_config() {
        let config = ProviderConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({"x": 1}),
        };
        assert!(matches!(
            HetznerFactory.create(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_dry_run_mode() {
        let provider_dry = HetznerProvider::new_dry_run("token").unwrap();
        let provider_live = HetznerProvider::new_live("token").unwrap();

        assert!(provider_dry.reconciler().is_dry_run());
        assert!(!provider_live.reconciler().is_dry_run());
    }

    #[test]
    fn test_custom_api_url_used() {
        let mut config = ProviderConfig::hetzner("token");
        if let ProviderConfig::Hetzner { api_url, .. } = &mut config {
            *api_url = Some("http://127.0.0.1:9000/api/v1".to_string());
        }

        let provider = HetznerProvider::from_config(&config).unwrap();
        assert_eq!(
            provider.reconciler().gateway().base_url(),
            "http://127.0.0.1:9000/api/v1"
        );
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let provider = HetznerProvider::new_live("secret_token_12345").unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("HetznerProvider"));
    }

    #[test]
    fn test_register() {
        let registry = dnsync_core::ProviderRegistry::new();
        register(&registry);
        assert!(registry.create_provider(&ProviderConfig::hetzner("token")).is_ok());
    }
}
