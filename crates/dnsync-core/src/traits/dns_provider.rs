// # DNS Provider Trait
//
// Defines the read/apply capability set every provider backend exposes to
// the orchestration layer.
//
// ## Implementations
//
// - Hetzner DNS: `dnsync-provider-hetzner` crate
// - Any backend wrapping a `ZoneGateway` in a `Reconciler`
//
// ## Usage
//
// ```rust,ignore
// use dnsync_core::{Changes, DnsProvider};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // Current state
//     let current = provider.records().await?;
//
//     // Converge to desired state
//     let changes = Changes { /* computed by the orchestration layer */ ..Default::default() };
//     provider.apply_changes(&changes).await?;
//
//     Ok(())
// }
// ```

use crate::endpoint::{Changes, Endpoint};
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Exactly two operations: read the current endpoint set, and apply a delta.
/// Backend-specific shapes stay behind the provider's gateway.
///
/// # Concurrency
///
/// Each call performs a fresh full read of provider state. Concurrent
/// `apply_changes` calls against the same zones are not safe; callers must
/// serialize them.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every supported record the provider holds, as endpoints
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: One endpoint per provider record, with
    ///   fully-qualified names
    /// - `Err(Error)`: If any zone or record listing failed
    async fn records(&self) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a delta to the provider
    ///
    /// All deletes are issued before any create. The first failure stops
    /// the pass and is returned.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every mutation committed (or was logged, in dry-run mode)
    /// - `Err(Error)`: Resolution failure (nothing mutated), or a mutation
    ///   failure (`Error::PartialApply` if earlier mutations committed)
    async fn apply_changes(&self, changes: &Changes) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
