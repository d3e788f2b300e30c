// # clouddns-core
//
// Provider-agnostic record management for DNS zones.
//
// ## Architecture Overview
//
// This library defines the contract that DNS backends implement:
// - **Record**: a single (name, type, value, ttl) entry, names relative to the zone
// - **RecordGetter / RecordAppender / RecordSetter / RecordDeleter**: the four
//   record operations, one trait each
// - **RecordProvider**: a backend implementing all four
// - **ProviderRegistry**: plugin-based registry of provider factories
// - **Error**: shared error kinds, including the structured conflict check
//
// ## Design Principles
//
// 1. **Translation only**: providers convert between these types and their
//    API; the remote service is the source of truth
// 2. **No hidden state**: nothing is cached beyond an authenticated session
// 3. **Loud failures**: every error reaches the caller

pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{CloudDnsConfig, ProviderConfig};
pub use error::{Error, Result};
pub use record::{Record, absolute_name, fqdn, relative_name};
pub use registry::ProviderRegistry;
pub use traits::{
    RecordAppender, RecordDeleter, RecordGetter, RecordProvider, RecordProviderFactory,
    RecordSetter,
};
