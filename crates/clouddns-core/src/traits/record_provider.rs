// # Record Provider Traits
//
// Defines the generic record-management interface that every DNS backend
// implements.
//
// ## Implementations
//
// - Google Cloud DNS: `clouddns-provider-google` crate
//
// ## Usage
//
// ```rust,ignore
// use clouddns_core::{Record, RecordAppender};
// use std::time::Duration;
//
// #[tokio::main]
// async fn main() -> clouddns_core::Result<()> {
//     let provider = /* RecordProvider implementation */;
//
//     let created = provider
//         .append_records(
//             "example.com.",
//             &[Record::new("www", "A", "1.2.3.4", Duration::from_secs(300))],
//         )
//         .await?;
//
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::record::Record;
use async_trait::async_trait;

/// Lists the records of a zone
#[async_trait]
pub trait RecordGetter: Send + Sync {
    /// Return every record in `zone`
    ///
    /// Multi-value record sets are flattened: one [`Record`] per value.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;
}

/// Adds records to a zone
#[async_trait]
pub trait RecordAppender: Send + Sync {
    /// Create `records` in `zone` and return the records that were added
    ///
    /// # Parameters
    ///
    /// - `zone`: Fully-qualified zone name (e.g. `example.com.`)
    /// - `records`: Records with names relative to `zone`
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// Replaces records in a zone
#[async_trait]
pub trait RecordSetter: Send + Sync {
    /// Make `records` the complete set of values for each (name, type) they
    /// mention, creating or overwriting as needed
    ///
    /// Names and types not mentioned in `records` are left untouched.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// Removes records from a zone
#[async_trait]
pub trait RecordDeleter: Send + Sync {
    /// Delete `records` from `zone` and return the records that were deleted
    ///
    /// Deleting a record that does not exist is an error if the backend
    /// reports one; it is never treated as success.
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// A backend offering the full record-management interface
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error Propagation
///
/// Implementations surface backend failures as [`crate::Error`] without
/// logging-and-continuing. Local recovery is limited to what a method
/// documents (see the Cloud DNS provider's conflict handling in
/// `append_records`).
pub trait RecordProvider: RecordGetter + RecordAppender + RecordSetter + RecordDeleter {
    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing record providers from configuration
pub trait RecordProviderFactory: Send + Sync {
    /// Create a RecordProvider instance from configuration
    ///
    /// # Returns
    ///
    /// A boxed RecordProvider trait object, or `Error::Config` when the
    /// configuration belongs to another provider or is invalid
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>>;
}
