//! Core traits for record management
//!
//! This module defines the abstract interfaces that all providers must follow.
//!
//! - [`RecordGetter`], [`RecordAppender`], [`RecordSetter`], [`RecordDeleter`]:
//!   the four record operations
//! - [`RecordProvider`]: a backend implementing all four
//! - [`RecordProviderFactory`]: construction from [`crate::ProviderConfig`]

pub mod record_provider;

pub use record_provider::{
    RecordAppender, RecordDeleter, RecordGetter, RecordProvider, RecordProviderFactory,
    RecordSetter,
};
