//! Error types for the ipmon-watch crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to inspect host network: {0}")]
    Probe(String),

    #[error("Snapshot store error: {0}")]
    Store(#[from] ipmon_core::StoreError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build mail message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Notification failed: {0}")]
    Notify(String),
}

impl From<config::ConfigError> for WatchError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
