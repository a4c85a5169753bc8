//! Test doubles and common utilities for reconciliation contract tests
//!
//! The fake gateway serves a fixed provider state and records every call in
//! order, so tests can assert both what was called and in which sequence.

#![allow(dead_code)]

use dnsync_core::error::{Error, Result};
use dnsync_core::traits::{NewRecord, ProviderRecord, Zone, ZoneGateway};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One observed gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListZones,
    ListRecords(String),
    Delete(String),
    Create(NewRecord),
}

impl GatewayCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, GatewayCall::Delete(_) | GatewayCall::Create(_))
    }
}

/// A ZoneGateway over in-memory state that tracks calls
#[derive(Default)]
pub struct FakeGateway {
    zones: Vec<Zone>,
    records: HashMap<String, Vec<ProviderRecord>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    fail_zones: bool,
    fail_records_for: HashSet<String>,
    fail_delete_ids: HashSet<String>,
    fail_create_names: HashSet<String>,
    next_id: Mutex<usize>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone with its records
    pub fn with_zone(mut self, id: &str, name: &str, records: Vec<ProviderRecord>) -> Self {
        self.zones.push(Zone::new(id, name));
        self.records.insert(id.to_string(), records);
        self
    }

    /// Make `list_zones` fail with a transport error
    pub fn failing_zones(mut self) -> Self {
        self.fail_zones = true;
        self
    }

    /// Make `list_records` fail for a zone
    pub fn failing_records_for(mut self, zone_id: &str) -> Self {
        self.fail_records_for.insert(zone_id.to_string());
        self
    }

    /// Make `delete_record` fail for a record ID
    pub fn failing_delete(mut self, record_id: &str) -> Self {
        self.fail_delete_ids.insert(record_id.to_string());
        self
    }

    /// Make `create_record` fail for a relative name
    pub fn failing_create(mut self, name: &str) -> Self {
        self.fail_create_names.insert(name.to_string());
        self
    }

    /// Every call observed so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only delete/create calls, in order
    pub fn mutation_calls(&self) -> Vec<GatewayCall> {
        self.calls().into_iter().filter(GatewayCall::is_mutation).collect()
    }

    fn record_call(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl ZoneGateway for FakeGateway {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.record_call(GatewayCall::ListZones);
        if self.fail_zones {
            return Err(Error::transport("zone listing timed out"));
        }
        Ok(self.zones.clone())
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ProviderRecord>> {
        self.record_call(GatewayCall::ListRecords(zone_id.to_string()));
        if self.fail_records_for.contains(zone_id) {
            return Err(Error::transport(format!("records of {} timed out", zone_id)));
        }
        self.records
            .get(zone_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("zone {}", zone_id)))
    }

    async fn create_record(&self, record: &NewRecord) -> Result<ProviderRecord> {
        self.record_call(GatewayCall::Create(record.clone()));
        if self.fail_create_names.contains(&record.name) {
            return Err(Error::protocol("422 Unprocessable Entity: invalid value"));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(ProviderRecord {
            id: format!("created-{}", *next_id),
            zone_id: record.zone_id.clone(),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
            created: None,
            modified: None,
        })
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.record_call(GatewayCall::Delete(record_id.to_string()));
        if self.fail_delete_ids.contains(record_id) {
            return Err(Error::not_found(format!("record {}", record_id)));
        }
        Ok(())
    }

    fn gateway_name(&self) -> &'static str {
        "fake"
    }
}

/// Helper to create a provider record
pub fn record(id: &str, zone_id: &str, record_type: &str, name: &str, value: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        zone_id: zone_id.to_string(),
        record_type: record_type.to_string(),
        name: name.to_string(),
        value: value.to_string(),
        ttl: Some(300),
        created: None,
        modified: None,
    }
}

/// The single-zone state used by several scenarios
pub fn example_de_gateway() -> FakeGateway {
    FakeGateway::new().with_zone(
        "z1",
        "example.de",
        vec![record("r1", "z1", "A", "test", "1.2.3.4")],
    )
}
