//! Core traits for the DNSync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ZoneGateway`]: Typed transport to a remote DNS API
//! - [`DnsProvider`]: Read/apply capability set exposed to the orchestration layer

pub mod dns_provider;
pub mod gateway;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use gateway::{NewRecord, ProviderRecord, Zone, ZoneGateway};
