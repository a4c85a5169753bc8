// # Zone Gateway Trait
//
// Defines the typed request/response boundary to a remote DNS API.
//
// ## Implementations
//
// - Hetzner DNS: `dnsync-provider-hetzner` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsync_core::ZoneGateway;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let gateway = /* ZoneGateway implementation */;
//
//     for zone in gateway.list_zones().await? {
//         let records = gateway.list_records(&zone.id).await?;
//         println!("{}: {} record(s)", zone.name, records.len());
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An authoritative DNS namespace hosted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Provider-assigned zone ID
    pub id: String,
    /// Zone name (e.g., "example.com")
    pub name: String,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A record as the provider stores it
///
/// `name` is zone-relative; `"@"` denotes the zone apex. The record `id` is
/// the only handle the provider accepts for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    /// Provider-assigned record ID
    pub id: String,
    /// ID of the owning zone
    pub zone_id: String,
    /// Record type (e.g., "A")
    pub record_type: String,
    /// Zone-relative name
    pub name: String,
    /// Record value
    pub value: String,
    /// TTL in seconds; `None` inherits the zone default
    pub ttl: Option<u32>,
    /// Creation timestamp, if reported
    pub created: Option<DateTime<Utc>>,
    /// Last modification timestamp, if reported
    pub modified: Option<DateTime<Utc>>,
}

/// Request payload for creating a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// ID of the zone to create the record in
    pub zone_id: String,
    /// Record type
    pub record_type: String,
    /// Zone-relative name ("@" for the apex)
    pub name: String,
    /// Record value
    pub value: String,
    /// TTL in seconds; omitted from the request when `None`
    pub ttl: Option<u32>,
}

/// Trait for DNS API gateways
///
/// A gateway is pure transport plus (de)serialization. It holds the
/// credential it was constructed with and nothing else: no caching, no
/// retries, no reconciliation logic.
///
/// # Errors
///
/// - `Error::Transport`: connection failure or timeout
/// - `Error::Protocol`: unexpected status or undecodable body
/// - `Error::NotFound`: the referenced zone or record does not exist
/// - `Error::Authentication` / `Error::RateLimited`: as reported by the API
#[async_trait]
pub trait ZoneGateway: Send + Sync {
    /// List every zone visible to the credential, following pagination
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List every record of a zone, following pagination
    ///
    /// # Parameters
    ///
    /// - `zone_id`: The zone ID as returned by [`ZoneGateway::list_zones`]
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ProviderRecord>, crate::Error>;

    /// Create exactly one record
    ///
    /// # Returns
    ///
    /// The created record, including the ID the provider assigned to it
    async fn create_record(&self, record: &NewRecord) -> Result<ProviderRecord, crate::Error>;

    /// Delete exactly one record by its ID
    ///
    /// Fails with `Error::NotFound` if the ID no longer exists.
    async fn delete_record(&self, record_id: &str) -> Result<(), crate::Error>;

    /// Get the gateway name (for logging/debugging)
    fn gateway_name(&self) -> &'static str;
}
