//! Provider-agnostic endpoint model
//!
//! An [`Endpoint`] is how the orchestration layer describes a DNS record it
//! wants (or currently sees). A [`Changes`] value is the delta it hands to
//! `DnsProvider::apply_changes`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record types the reconciler reads and writes.
///
/// Records of any other type are invisible to both the read path and the
/// lookup index, so they are never created or deleted.
pub const SUPPORTED_RECORD_TYPES: &[&str] = &["A", "AAAA", "CNAME", "MX", "NS", "SRV", "TXT"];

/// Check if a record type is one the reconciler manages
pub fn is_supported_record_type(record_type: &str) -> bool {
    SUPPORTED_RECORD_TYPES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(record_type))
}

/// A desired or observed DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully-qualified DNS name (e.g., "www.example.com")
    pub dns_name: String,

    /// Record type (e.g., "A", "TXT")
    pub record_type: String,

    /// Record values; only the first is written on create
    #[serde(default)]
    pub targets: Vec<String>,

    /// Time-to-live in seconds; `None` means the zone default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl Endpoint {
    /// Create a new endpoint without a TTL
    pub fn new(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            ttl: None,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.dns_name, self.record_type, self.targets.join(", "))
    }
}

/// Delta between desired and current state
///
/// Updates arrive as `update_old`/`update_new` pairs. The provider API has no
/// update primitive, so the old side is deleted and the new side created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    /// Endpoints to create
    #[serde(default)]
    pub create: Vec<Endpoint>,

    /// Current side of updated endpoints
    #[serde(default)]
    pub update_old: Vec<Endpoint>,

    /// Desired side of updated endpoints
    #[serde(default)]
    pub update_new: Vec<Endpoint>,

    /// Endpoints to delete
    #[serde(default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Parse a change set from its JSON document form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True if there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }

    /// Endpoints whose current records must be removed, in issue order
    pub fn deletions(&self) -> impl Iterator<Item = &Endpoint> {
        self.delete.iter().chain(self.update_old.iter())
    }

    /// Endpoints that must be written, in issue order
    pub fn creations(&self) -> impl Iterator<Item = &Endpoint> {
        self.create.iter().chain(self.update_new.iter())
    }
}
