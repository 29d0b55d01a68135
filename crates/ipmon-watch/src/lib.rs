//! ipmon-watch: Periodic network configuration checks for a single host.
//!
//! Captures the host's hostname and interface addresses, compares them with
//! the last saved snapshot, and mails a report when something changed.

pub mod config;
pub mod error;
pub mod notify;
pub mod probe;
pub mod scheduler;
