//! ipmon-core: Snapshot model, change detection, and reporting for ipmon.
//!
//! This crate holds the parts of ipmon with real semantics:
//! - [`Snapshot`], the hostname + interface address record of a host
//! - [`diff`] and [`report`], the text produced when a change is detected
//! - [`store`], JSON persistence of the last known snapshot
//!
//! Nothing in here logs; failures are returned to the caller.

pub mod diff;
pub mod error;
pub mod report;
pub mod snapshot;
pub mod store;

pub use diff::{diff, SnapshotDiff};
pub use error::StoreError;
pub use report::report;
pub use snapshot::Snapshot;
pub use store::{JsonFileStore, SnapshotStore};
