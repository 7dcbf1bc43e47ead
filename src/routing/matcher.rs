//! Host-header matching.
//!
//! # Responsibilities
//! - Match a Host header against a rule's condition hosts (exact match)
//! - Normalize case and strip any `:port` suffix before comparing
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - No wildcards: compiled rules only ever carry exact hosts

use std::collections::BTreeSet;

/// Trait for matching a Host header against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the host satisfies this condition.
    fn matches(&self, host: &str) -> bool;
}

/// Matches any of a fixed set of hosts.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_hosts: BTreeSet<String>,
}

impl HostMatcher {
    /// Hosts are normalized to lowercase for case-insensitive matching.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            expected_hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, host: &str) -> bool {
        self.expected_hosts.contains(&normalize_host(host))
    }
}

/// Lowercase a Host header value and drop a trailing `:port` or root dot.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    without_port
        .strip_suffix('.')
        .unwrap_or(without_port)
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_matcher() {
        let matcher = HostMatcher::new(["app.clearml.example.org"]);

        assert!(matcher.matches("app.clearml.example.org"));
        assert!(matcher.matches("APP.ClearML.Example.ORG")); // Case insensitive
        assert!(matcher.matches("app.clearml.example.org:443"));
        assert!(matcher.matches("app.clearml.example.org."));
        assert!(!matcher.matches("files.clearml.example.org"));
        assert!(!matcher.matches("clearml.example.org"));
    }

    #[test]
    fn test_no_suffix_matching() {
        let matcher = HostMatcher::new(["example.org"]);
        assert!(!matcher.matches("app.example.org"));
    }
}
