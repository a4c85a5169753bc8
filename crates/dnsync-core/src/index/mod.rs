//! Current-state snapshot and record lookup index
//!
//! A reconciliation pass starts by reading every zone and every record from
//! the gateway into a [`Snapshot`]. Both the read path and the change planner
//! work off that snapshot, so both see names normalized by the same rule:
//!
//! ```text
//! relative "@"   in zone example.com  ->  example.com
//! relative "www" in zone example.com  ->  www.example.com
//! ```
//!
//! Nothing here is cached between passes.

use crate::endpoint::{Endpoint, is_supported_record_type};
use crate::error::{Error, Result};
use crate::traits::{ProviderRecord, Zone, ZoneGateway};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Relative name the provider uses for the zone apex
pub const APEX: &str = "@";

/// Build the fully-qualified name of a zone-relative record name
///
/// An empty relative name is treated like `"@"`.
pub fn fqdn(zone: &Zone, relative_name: &str) -> String {
    if relative_name == APEX || relative_name.is_empty() {
        zone.name.clone()
    } else {
        format!("{}.{}", relative_name, zone.name)
    }
}

/// Canonical comparison form of a DNS name: lowercase, no trailing dot
pub fn canonical_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Whether `dns_name` lies inside `zone_name` (or is its apex)
pub fn in_zone(zone_name: &str, dns_name: &str) -> bool {
    let zone = canonical_name(zone_name);
    let name = canonical_name(dns_name);
    name == zone || name.ends_with(&format!(".{}", zone))
}

/// Convert a fully-qualified name into the zone-relative form the API expects
///
/// Returns `None` if the name is not inside the zone.
pub fn relative_name(zone: &Zone, dns_name: &str) -> Option<String> {
    if !in_zone(&zone.name, dns_name) {
        return None;
    }

    let zone_len = canonical_name(&zone.name).len();
    let name = dns_name.trim_end_matches('.');
    if name.len() == zone_len {
        return Some(APEX.to_string());
    }

    // Strip ".<zone>" keeping the caller's casing of the leading labels
    Some(name[..name.len() - zone_len - 1].to_string())
}

/// Lookup key: (fully-qualified name, record type), compared canonically
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// Canonical fully-qualified name
    pub name: String,
    /// Uppercase record type
    pub record_type: String,
}

impl RecordKey {
    pub fn new(name: &str, record_type: &str) -> Self {
        Self {
            name: canonical_name(name),
            record_type: record_type.to_ascii_uppercase(),
        }
    }
}

/// One zone's records as read during a pass
#[derive(Debug, Clone)]
pub struct ZoneSnapshot {
    pub zone: Zone,
    /// Supported-type records only
    pub records: Vec<ProviderRecord>,
}

/// Full current state of the provider, read fresh for one pass
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub zones: Vec<ZoneSnapshot>,
}

impl Snapshot {
    /// Read every zone and every supported record from the gateway
    ///
    /// Fails on the first listing error; a partial snapshot is never returned.
    pub async fn read(gateway: &dyn ZoneGateway) -> Result<Self> {
        let zones = gateway.list_zones().await?;
        debug!("Read {} zone(s) from {}", zones.len(), gateway.gateway_name());

        let mut snapshots = Vec::with_capacity(zones.len());
        for zone in zones {
            let listed = gateway.list_records(&zone.id).await?;
            let total = listed.len();

            let mut records = Vec::with_capacity(total);
            for mut record in listed {
                if !is_supported_record_type(&record.record_type) {
                    trace!(
                        "Skipping unsupported record type {} ({} in {})",
                        record.record_type, record.name, zone.name
                    );
                    continue;
                }

                if record.zone_id.is_empty() {
                    record.zone_id = zone.id.clone();
                } else if record.zone_id != zone.id {
                    return Err(Error::protocol(format!(
                        "Record {} listed under zone {} claims zone {}",
                        record.id, zone.id, record.zone_id
                    )));
                }

                records.push(record);
            }

            debug!(
                "Zone {}: {} record(s), {} of a supported type",
                zone.name,
                total,
                records.len()
            );
            snapshots.push(ZoneSnapshot { zone, records });
        }

        Ok(Self { zones: snapshots })
    }

    /// Every zone in the snapshot
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().map(|z| &z.zone)
    }

    /// Every record paired with its fully-qualified name
    pub fn named_records(&self) -> impl Iterator<Item = (String, &ProviderRecord)> {
        self.zones.iter().flat_map(|z| {
            z.records
                .iter()
                .map(move |record| (fqdn(&z.zone, &record.name), record))
        })
    }

    /// The read-path view: one endpoint per record
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.named_records()
            .map(|(dns_name, record)| Endpoint {
                dns_name,
                record_type: record.record_type.clone(),
                targets: vec![record.value.clone()],
                ttl: record.ttl,
            })
            .collect()
    }
}

/// Lookup from (name, type) to the provider records holding that key
///
/// Keys are not assumed unique: a provider may hold several records with the
/// same name and type (round-robin A records, or a name reachable through
/// nested zones). Callers decide how to disambiguate.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    records: HashMap<RecordKey, Vec<ProviderRecord>>,
    zones: Vec<Zone>,
}

impl RecordIndex {
    /// Build the index from a snapshot
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut records: HashMap<RecordKey, Vec<ProviderRecord>> = HashMap::new();
        for (name, record) in snapshot.named_records() {
            records
                .entry(RecordKey::new(&name, &record.record_type))
                .or_default()
                .push(record.clone());
        }

        Self {
            records,
            zones: snapshot.zones().cloned().collect(),
        }
    }

    /// Records stored under a name and type
    pub fn lookup(&self, dns_name: &str, record_type: &str) -> &[ProviderRecord] {
        self.records
            .get(&RecordKey::new(dns_name, record_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find the zone owning a DNS name by longest matching suffix
    ///
    /// With zones `example.com` and `sub.example.com`, the name
    /// `a.sub.example.com` belongs to `sub.example.com`.
    pub fn zone_for(&self, dns_name: &str) -> Option<&Zone> {
        self.zones
            .iter()
            .filter(|zone| in_zone(&zone.name, dns_name))
            .max_by_key(|zone| canonical_name(&zone.name).len())
    }

    /// Zones known to the index
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
