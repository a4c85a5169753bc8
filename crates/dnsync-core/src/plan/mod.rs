//! Change planning
//!
//! Turns a name-based delta into an ordered list of ID-based mutations. This
//! is a pure function of the current-state [`RecordIndex`] and the desired
//! [`Changes`]; no I/O happens here, so a plan can be inspected or tested
//! without a network.
//!
//! ## Ordering
//!
//! Every delete precedes every create. An update of `www A` is planned as
//! "delete the current `www A` record, then create the new one", so at no
//! point do two live records share the key because of this pass.

use crate::endpoint::{Changes, Endpoint, is_supported_record_type};
use crate::error::{Error, Result};
use crate::index::{RecordIndex, relative_name};
use crate::traits::{NewRecord, ProviderRecord};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// A single provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Delete one record by ID
    Delete {
        record_id: String,
        zone_id: String,
        dns_name: String,
        record_type: String,
    },

    /// Create one record
    Create {
        /// Fully-qualified name, for logging
        dns_name: String,
        record: NewRecord,
    },
}

impl Mutation {
    pub fn is_delete(&self) -> bool {
        matches!(self, Mutation::Delete { .. })
    }

    pub fn dns_name(&self) -> &str {
        match self {
            Mutation::Delete { dns_name, .. } | Mutation::Create { dns_name, .. } => dns_name,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Delete {
                record_id,
                zone_id,
                dns_name,
                record_type,
            } => write!(
                f,
                "delete {} {} (record {}, zone {})",
                record_type, dns_name, record_id, zone_id
            ),
            Mutation::Create { dns_name, record } => write!(
                f,
                "create {} {} -> {} (zone {})",
                record.record_type, dns_name, record.value, record.zone_id
            ),
        }
    }
}

/// Ordered mutations for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    mutations: Vec<Mutation>,
}

impl Plan {
    /// Resolve every endpoint of `changes` against `index`
    ///
    /// Fails without producing a partial plan when any endpoint cannot be
    /// resolved, so a caller that plans first never mutates on bad input.
    ///
    /// # Errors
    ///
    /// - `Error::Resolution`: a deletion names a record that does not exist
    /// - `Error::AmbiguousRecord`: several records share the deletion's key
    ///   and none of them carries one of its targets
    /// - `Error::ZoneNotFound`: no zone contains a creation's name
    /// - `Error::InvalidInput`: a creation has no targets or an unmanaged
    ///   record type
    pub fn build(index: &RecordIndex, changes: &Changes) -> Result<Self> {
        let mut deletes = Vec::new();
        let mut seen = HashSet::new();

        for endpoint in changes.deletions() {
            for record in resolve_existing(index, endpoint)? {
                if !seen.insert(record.id.clone()) {
                    continue;
                }
                deletes.push(Mutation::Delete {
                    record_id: record.id.clone(),
                    zone_id: record.zone_id.clone(),
                    dns_name: endpoint.dns_name.clone(),
                    record_type: record.record_type.clone(),
                });
            }
        }

        let mut creates = Vec::new();
        for endpoint in changes.creations() {
            creates.push(plan_create(index, endpoint)?);
        }

        deletes.extend(creates);
        Ok(Self { mutations: deletes })
    }

    /// Mutations in issue order
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn deletes(&self) -> impl Iterator<Item = &Mutation> {
        self.mutations.iter().filter(|m| m.is_delete())
    }

    pub fn creates(&self) -> impl Iterator<Item = &Mutation> {
        self.mutations.iter().filter(|m| !m.is_delete())
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

impl IntoIterator for Plan {
    type Item = Mutation;
    type IntoIter = std::vec::IntoIter<Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.into_iter()
    }
}

/// Find the current records a deletion endpoint refers to
fn resolve_existing<'a>(
    index: &'a RecordIndex,
    endpoint: &Endpoint,
) -> Result<Vec<&'a ProviderRecord>> {
    match index.lookup(&endpoint.dns_name, &endpoint.record_type) {
        [] => Err(Error::resolution(format!(
            "no {} record named {} to delete",
            endpoint.record_type, endpoint.dns_name
        ))),
        [only] => Ok(vec![only]),
        candidates => {
            let matched: Vec<_> = candidates
                .iter()
                .filter(|record| endpoint.targets.iter().any(|t| *t == record.value))
                .collect();

            if matched.is_empty() {
                return Err(Error::ambiguous(format!(
                    "{} {} records named {}, none with a value in [{}]",
                    candidates.len(),
                    endpoint.record_type,
                    endpoint.dns_name,
                    endpoint.targets.join(", ")
                )));
            }
            Ok(matched)
        }
    }
}

fn plan_create(index: &RecordIndex, endpoint: &Endpoint) -> Result<Mutation> {
    // Types the read path filters out are never written
    if !is_supported_record_type(&endpoint.record_type) {
        return Err(Error::invalid_input(format!(
            "record type {} of {} is not managed",
            endpoint.record_type, endpoint.dns_name
        )));
    }

    let value = endpoint.targets.first().ok_or_else(|| {
        Error::invalid_input(format!("endpoint {} has no targets", endpoint.dns_name))
    })?;

    if endpoint.targets.len() > 1 {
        // Single-value record API: one record per endpoint
        warn!(
            "Endpoint {} {} has {} targets; only {} is written",
            endpoint.dns_name,
            endpoint.record_type,
            endpoint.targets.len(),
            value
        );
    }

    let zone = index
        .zone_for(&endpoint.dns_name)
        .ok_or_else(|| Error::zone_not_found(endpoint.dns_name.clone()))?;

    let name = relative_name(zone, &endpoint.dns_name)
        .ok_or_else(|| Error::zone_not_found(endpoint.dns_name.clone()))?;

    Ok(Mutation::Create {
        dns_name: endpoint.dns_name.clone(),
        record: NewRecord {
            zone_id: zone.id.clone(),
            record_type: endpoint.record_type.to_ascii_uppercase(),
            name,
            value: value.clone(),
            ttl: endpoint.ttl,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Snapshot, ZoneSnapshot};
    use crate::traits::Zone;

    fn record(id: &str, zone_id: &str, record_type: &str, name: &str, value: &str) -> ProviderRecord {
        ProviderRecord {
            id: id.to_string(),
            zone_id: zone_id.to_string(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            ttl: None,
            created: None,
            modified: None,
        }
    }

    fn index() -> RecordIndex {
        RecordIndex::build(&Snapshot {
            zones: vec![
                ZoneSnapshot {
                    zone: Zone::new("z1", "example.com"),
                    records: vec![
                        record("r1", "z1", "A", "@", "1.1.1.1"),
                        record("r2", "z1", "A", "www", "2.2.2.2"),
                        record("r3", "z1", "A", "rr", "3.3.3.3"),
                        record("r4", "z1", "A", "rr", "4.4.4.4"),
                    ],
                },
                ZoneSnapshot {
                    zone: Zone::new("z2", "sub.example.com"),
                    records: vec![],
                },
            ],
        })
    }

    #[test]
    fn test_empty_changes_plan_nothing() {
        let plan = Plan::build(&index(), &Changes::default()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_update_plans_delete_before_create() {
        let changes = Changes {
            create: vec![Endpoint::new("new.example.com", "A", ["5.5.5.5"])],
            update_old: vec![Endpoint::new("www.example.com", "A", ["2.2.2.2"])],
            update_new: vec![Endpoint::new("www.example.com", "A", ["6.6.6.6"])],
            ..Default::default()
        };

        let plan = Plan::build(&index(), &changes).unwrap();
        let kinds: Vec<_> = plan.mutations().iter().map(Mutation::is_delete).collect();
        assert_eq!(kinds, vec![true, false, false]);

        match &plan.mutations()[0] {
            Mutation::Delete { record_id, .. } => assert_eq!(record_id, "r2"),
            other => panic!("unexpected {other}"),
        }
        match &plan.mutations()[2] {
            Mutation::Create { record, .. } => {
                assert_eq!(record.name, "www");
                assert_eq!(record.value, "6.6.6.6");
                assert_eq!(record.zone_id, "z1");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_create_uses_relative_name_and_nested_zone() {
        let changes = Changes {
            create: vec![
                Endpoint::new("a.sub.example.com", "TXT", ["hello"]).with_ttl(60),
                Endpoint::new("example.com", "MX", ["10 mail.example.com"]),
            ],
            ..Default::default()
        };

        let plan = Plan::build(&index(), &changes).unwrap();
        let records: Vec<_> = plan
            .creates()
            .map(|m| match m {
                Mutation::Create { record, .. } => record.clone(),
                _ => unreachable!(),
            })
            .collect();

        assert_eq!(records[0].zone_id, "z2");
        assert_eq!(records[0].name, "a");
        assert_eq!(records[0].ttl, Some(60));
        assert_eq!(records[1].zone_id, "z1");
        assert_eq!(records[1].name, "@");
    }

    #[test]
    fn test_missing_record_is_resolution_error() {
        let changes = Changes {
            delete: vec![Endpoint::new("missing.example.com", "A", ["9.9.9.9"])],
            ..Default::default()
        };

        let err = Plan::build(&index(), &changes).unwrap_err();
        assert!(matches!(err, Error::Resolution(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_zone_is_zone_not_found() {
        let changes = Changes {
            create: vec![Endpoint::new("www.example.org", "A", ["1.2.3.4"])],
            ..Default::default()
        };

        let err = Plan::build(&index(), &changes).unwrap_err();
        assert!(matches!(err, Error::ZoneNotFound(ref n) if n == "www.example.org"));
    }

    #[test]
    fn test_create_without_targets_is_rejected() {
        let changes = Changes {
            create: vec![Endpoint::new("x.example.com", "A", Vec::<String>::new())],
            ..Default::default()
        };

        assert!(matches!(
            Plan::build(&index(), &changes),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_key_disambiguated_by_target() {
        let changes = Changes {
            delete: vec![Endpoint::new("rr.example.com", "A", ["4.4.4.4"])],
            ..Default::default()
        };
        let plan = Plan::build(&index(), &changes).unwrap();
        assert_eq!(plan.len(), 1);
        assert!(plan.mutations()[0].to_string().contains("record r4"));

        let changes = Changes {
            delete: vec![Endpoint::new("rr.example.com", "A", ["3.3.3.3", "4.4.4.4"])],
            ..Default::default()
        };
        assert_eq!(Plan::build(&index(), &changes).unwrap().len(), 2);

        let changes = Changes {
            delete: vec![Endpoint::new("rr.example.com", "A", ["7.7.7.7"])],
            ..Default::default()
        };
        assert!(matches!(
            Plan::build(&index(), &changes),
            Err(Error::AmbiguousRecord(_))
        ));
    }

    #[test]
    fn test_same_record_deleted_once() {
        let www = Endpoint::new("www.example.com", "A", ["2.2.2.2"]);
        let changes = Changes {
            delete: vec![www.clone()],
            update_old: vec![www],
            ..Default::default()
        };

        assert_eq!(Plan::build(&index(), &changes).unwrap().len(), 1);
    }

    #[test]
    fn test_create_record_type_is_uppercased() {
        let changes = Changes {
            create: vec![Endpoint::new("mail.example.com", "aaaa", ["2001:db8::1"])],
            ..Default::default()
        };

        let plan = Plan::build(&index(), &changes).unwrap();
        match plan.mutations() {
            [Mutation::Create { record, .. }] => assert_eq!(record.record_type, "AAAA"),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_create_of_unmanaged_type_is_rejected() {
        let changes = Changes {
            create: vec![Endpoint::new("example.com", "CAA", ["0 issue \"letsencrypt.org\""])],
            ..Default::default()
        };

        assert!(matches!(
            Plan::build(&index(), &changes),
            Err(Error::InvalidInput(_))
        ));
    }
}
