// # dnsync-core
//
// Core library for converging a DNS provider's records to a desired
// endpoint set.
//
// ## Architecture Overview
//
// - **ZoneGateway**: Trait for typed transport to a provider's DNS API
// - **Snapshot / RecordIndex**: Fresh per-pass view of provider state, keyed
//   by fully-qualified name and record type
// - **Plan**: Pure resolution of a `Changes` delta into ordered mutations
// - **Reconciler**: Engine that reads, plans, and issues mutations
// - **DnsProvider**: The read/apply capability set exposed to orchestration
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Fresh reads**: Every pass reads full provider state; nothing is cached
// 2. **Plan before mutate**: Resolution failures never leave partial changes
// 3. **Deletes first**: Every delete of a pass precedes every create
// 4. **Fail fast, report partial**: The first failed mutation stops the pass
//    and committed mutations are reported with it

pub mod config;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod index;
pub mod plan;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use endpoint::{Changes, Endpoint};
pub use engine::Reconciler;
pub use error::{Error, Result};
pub use index::{RecordIndex, Snapshot};
pub use plan::{Mutation, Plan};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, NewRecord, ProviderRecord, Zone, ZoneGateway};
