//! The network snapshot of a single host.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Hostname and interface addresses of a host at one point in time.
///
/// Addresses are kept exactly as the OS reported them (e.g. `"192.168.0.17/24"`).
/// They are never parsed; the text is only used for equality and membership.
///
/// The derived `PartialEq` is plain structural equality. Change detection
/// goes through [`Snapshot::is_changed`], which is membership based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    hostname: String,
    #[serde(rename = "ips", default, deserialize_with = "null_as_default")]
    addresses: Vec<String>,
}

impl Snapshot {
    pub fn new(hostname: impl Into<String>, addresses: Vec<String>) -> Self {
        Self {
            hostname: hostname.into(),
            addresses,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Number of address entries, duplicates included.
    pub fn count(&self) -> usize {
        self.addresses.len()
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    /// Whether `self` differs from `other`.
    ///
    /// A change is any of: different hostname, different address count, or
    /// an address of `self` missing from `other`. Only `self`'s addresses are
    /// scanned, so callers must pass the current snapshot as `self` and the
    /// previous one as `other`.
    pub fn is_changed(&self, other: &Snapshot) -> bool {
        if self.hostname != other.hostname {
            return true;
        }
        if self.count() != other.count() {
            return true;
        }
        self.addresses.iter().any(|a| !other.contains(a))
    }

    pub fn is_unchanged(&self, other: &Snapshot) -> bool {
        !self.is_changed(other)
    }

    /// Human-readable form used in notification bodies.
    pub fn render(&self) -> String {
        format!(
            "Hostname: {}\nIPs:\n{}",
            self.hostname,
            self.addresses.join("\n")
        )
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Older snapshot files carry `null` instead of an empty list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(hostname: &str, addresses: &[&str]) -> Snapshot {
        Snapshot::new(hostname, addresses.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn count_includes_duplicates() {
        let s = snapshot("host", &["127.0.0.1", "127.0.0.1", "10.0.0.1"]);
        assert_eq!(s.count(), 3);
        assert_eq!(Snapshot::default().count(), 0);
    }

    #[test]
    fn contains_is_exact() {
        let s = snapshot("host", &["fe80::1/64", "10.0.0.1/8"]);
        assert!(s.contains("10.0.0.1/8"));
        assert!(!s.contains("10.0.0.1"));
        assert!(!s.contains("FE80::1/64"));
    }

    #[test]
    fn render_format() {
        let s = snapshot("example", &["127.0.0.1", "192.168.0.105"]);
        assert_eq!(s.render(), "Hostname: example\nIPs:\n127.0.0.1\n192.168.0.105");
        assert_eq!(s.to_string(), s.render());
    }

    #[test]
    fn render_without_addresses() {
        assert_eq!(snapshot("lonely", &[]).render(), "Hostname: lonely\nIPs:\n");
    }

    #[test]
    fn identical_snapshot_is_unchanged() {
        let s = snapshot("example", &["127.0.0.1", "192.168.0.19"]);
        assert!(s.is_unchanged(&s.clone()));
        assert!(!s.is_changed(&s));
    }

    #[test]
    fn reordered_addresses_are_unchanged() {
        let current = snapshot("example", &["127.0.0.1", "192.168.0.19"]);
        let previous = snapshot("example", &["192.168.0.19", "127.0.0.1"]);
        assert!(current.is_unchanged(&previous));
        assert_ne!(current, previous);
    }

    #[test]
    fn detects_changes() {
        let current = snapshot("example", &["127.0.0.1", "192.168.0.19"]);
        let others = [
            snapshot("example", &["127.0.0.1", "192.168.0.3"]),
            snapshot("example", &["127.0.0.1", "192.168.0.19", "10.0.0.1"]),
            snapshot("example", &["127.0.0.1"]),
            snapshot("example2", &["127.0.0.1", "192.168.0.19"]),
            snapshot("example", &[]),
            snapshot("", &["127.0.0.1", "192.168.0.19"]),
            Snapshot::default(),
        ];

        for other in &others {
            assert!(current.is_changed(other), "{current:?} vs {other:?}");
        }
    }

    #[test]
    fn change_check_scans_only_self() {
        // Same size, every address of `current` present in `previous`,
        // but `previous` holds an address `current` lacks.
        let current = snapshot("example", &["10.0.0.1", "10.0.0.1"]);
        let previous = snapshot("example", &["10.0.0.1", "10.0.0.2"]);
        assert!(current.is_unchanged(&previous));
        assert!(previous.is_changed(&current));
    }

    #[test]
    fn deserialize_missing_fields() {
        let s: Snapshot = serde_json::from_str(r#"{"hostname":"x"}"#).unwrap();
        assert_eq!(s.hostname(), "x");
        assert!(s.addresses().is_empty());

        let s: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Snapshot::default());
    }

    #[test]
    fn deserialize_null_fields() {
        let s: Snapshot = serde_json::from_str(r#"{"hostname":null,"ips":null}"#).unwrap();
        assert_eq!(s, Snapshot::default());
    }

    #[test]
    fn serialize_writes_both_fields() {
        let json = serde_json::to_value(Snapshot::default()).unwrap();
        assert_eq!(json, serde_json::json!({"hostname": "", "ips": []}));
    }
}
