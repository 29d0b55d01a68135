//! Change detection between the current and the previous snapshot.

use std::fmt;

use crate::snapshot::Snapshot;

/// What changed between two snapshots.
///
/// Renders through `Display` as one line per difference, in the order
/// hostname, address count, new addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// `(previous, current)` hostnames, when they differ.
    pub hostname: Option<(String, String)>,
    /// `(previous, current)` address counts, when they differ.
    pub count: Option<(usize, usize)>,
    /// Addresses of the current snapshot absent from the previous one,
    /// in current order.
    pub new_addresses: Vec<String>,
}

impl SnapshotDiff {
    pub fn compute(current: &Snapshot, previous: &Snapshot) -> Self {
        let hostname = (current.hostname() != previous.hostname()).then(|| {
            (
                previous.hostname().to_string(),
                current.hostname().to_string(),
            )
        });

        let count = (current.count() != previous.count())
            .then(|| (previous.count(), current.count()));

        let new_addresses = current
            .addresses()
            .iter()
            .filter(|a| !previous.contains(a))
            .cloned()
            .collect();

        Self {
            hostname,
            count,
            new_addresses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hostname.is_none() && self.count.is_none() && self.new_addresses.is_empty()
    }
}

impl fmt::Display for SnapshotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((previous, current)) = &self.hostname {
            writeln!(f, "Hostname changed: {previous} -> {current}")?;
        }
        if let Some((previous, current)) = self.count {
            writeln!(f, "IP count changed: {previous} -> {current}")?;
        }
        for address in &self.new_addresses {
            writeln!(f, "New IP: {address}")?;
        }
        Ok(())
    }
}

/// Line-oriented diff report of `current` against `previous`.
///
/// Empty when nothing differs in the scanned direction.
pub fn diff(current: &Snapshot, previous: &Snapshot) -> String {
    SnapshotDiff::compute(current, previous).to_string()
}
