//! Core reconciliation engine
//!
//! The Reconciler is responsible for:
//! - Reading current provider state through a ZoneGateway
//! - Resolving a desired delta into an ordered plan
//! - Issuing the plan's mutations and reporting partial failure
//!
//! ## Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!   Changes ────────────▶│  Reconciler  │────────▶ Result
//!                        └──────────────┘
//!                          │    │    │
//!          ┌───────────────┘    │    └───────────────┐
//!          ▼                    ▼                    ▼
//! ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐
//! │ Snapshot/Index  │  │      Plan       │  │   ZoneGateway   │
//! │ (read)          │  │ (resolve)       │  │ (mutate)        │
//! └─────────────────┘  └─────────────────┘  └─────────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! 1. Read every zone and record (abort on any read failure)
//! 2. Build the index and resolve every endpoint (abort on any resolution failure)
//! 3. Issue all deletes, then all creates
//! 4. Stop at the first failed mutation and return it

use crate::endpoint::{Changes, Endpoint};
use crate::error::{Error, Result};
use crate::index::{RecordIndex, Snapshot};
use crate::plan::{Mutation, Plan};
use crate::traits::{DnsProvider, ZoneGateway};
use async_trait::async_trait;
use tracing::{debug, error, info};

/// Reconciliation engine over a single gateway
///
/// Holds no state between passes: every call rebuilds its view of the
/// provider from scratch.
///
/// ## Dry-Run Mode
///
/// When `dry_run` is true, the reconciler will:
/// - Perform the full read and planning
/// - Log every mutation it would issue
/// - **NOT** call any mutating gateway method
pub struct Reconciler<G> {
    gateway: G,
    dry_run: bool,
}

impl<G: ZoneGateway> Reconciler<G> {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `gateway`: Transport to the provider API
    /// - `dry_run`: If true, log mutations instead of issuing them
    pub fn new(gateway: G, dry_run: bool) -> Self {
        Self { gateway, dry_run }
    }

    /// The underlying gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Read a fresh snapshot of provider state
    pub async fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::read(&self.gateway).await
    }

    /// Current state as endpoints
    pub async fn list_endpoints(&self) -> Result<Vec<Endpoint>> {
        let endpoints = self.snapshot().await?.endpoints();
        debug!("Read {} endpoint(s)", endpoints.len());
        Ok(endpoints)
    }

    /// Resolve `changes` against fresh provider state without mutating
    pub async fn plan_changes(&self, changes: &Changes) -> Result<Plan> {
        let snapshot = self.snapshot().await?;
        let index = RecordIndex::build(&snapshot);
        debug!(
            "Built index: {} key(s) across {} zone(s)",
            index.len(),
            index.zones().len()
        );

        Plan::build(&index, changes)
    }

    /// Apply `changes` to the provider
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every planned mutation committed
    /// - `Err(Error)`: The read or planning failure (nothing mutated), the
    ///   first mutation's failure, or `Error::PartialApply` when earlier
    ///   mutations had already committed
    pub async fn apply(&self, changes: &Changes) -> Result<()> {
        if changes.is_empty() {
            debug!("No changes to apply");
            return Ok(());
        }

        let plan = self.plan_changes(changes).await?;
        info!(
            "Applying {} delete(s) and {} create(s) [mode: {}]",
            plan.deletes().count(),
            plan.creates().count(),
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        self.execute(plan).await
    }

    /// Issue a plan's mutations in order, stopping at the first failure
    pub async fn execute(&self, plan: Plan) -> Result<()> {
        let mut committed = Vec::with_capacity(plan.len());

        for mutation in plan {
            if self.dry_run {
                info!("[DRY-RUN] Would {}", mutation);
                continue;
            }

            if let Err(e) = self.issue(&mutation).await {
                error!(
                    "Failed to {} via {}: {} ({} mutation(s) already committed)",
                    mutation,
                    self.gateway.gateway_name(),
                    e,
                    committed.len()
                );

                if committed.is_empty() {
                    return Err(e);
                }
                return Err(Error::PartialApply {
                    committed,
                    failed_at: mutation,
                    source: Box::new(e),
                });
            }

            committed.push(mutation);
        }

        if !self.dry_run {
            info!("Applied {} mutation(s)", committed.len());
        }
        Ok(())
    }

    async fn issue(&self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::Delete { record_id, .. } => {
                self.gateway.delete_record(record_id).await?;
                info!("Deleted: {}", mutation);
            }
            Mutation::Create { record, .. } => {
                let created = self.gateway.create_record(record).await?;
                info!("Created: {} as record {}", mutation, created.id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<G: ZoneGateway> DnsProvider for Reconciler<G> {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        self.list_endpoints().await
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<()> {
        self.apply(changes).await
    }

    fn provider_name(&self) -> &'static str {
        self.gateway.gateway_name()
    }
}
