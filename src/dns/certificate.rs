//! Certificate names for TLS termination on the HTTPS listener.
//!
//! # Responsibilities
//! - Derive the apex and wildcard names a certificate needs so that every
//!   routed host is covered
//! - Check coverage with single-label wildcard semantics

use std::collections::BTreeSet;

use serde::Serialize;

use crate::routing::matcher::normalize_host;
use crate::routing::rule::RoutingRule;

/// DNS-validated certificate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSpec {
    pub domain_name: String,
    pub subject_alternative_names: BTreeSet<String>,
}

impl CertificateSpec {
    /// Apex name plus `*.{base}` and one `*.{parent}` per nested subdomain.
    pub fn covering(base_domain: &str, rules: &[RoutingRule]) -> Self {
        let base = base_domain.to_ascii_lowercase();
        let mut sans = BTreeSet::from([format!("*.{base}")]);

        for rule in rules {
            if let Some((_, parent)) = rule.fully_qualified_host.split_once('.') {
                if parent != base {
                    sans.insert(format!("*.{parent}"));
                }
            }
        }

        Self {
            domain_name: base,
            subject_alternative_names: sans,
        }
    }

    /// True if the apex or a SAN matches `host`. A wildcard covers exactly
    /// one extra label.
    pub fn covers(&self, host: &str) -> bool {
        let host = normalize_host(host);
        std::iter::once(&self.domain_name)
            .chain(&self.subject_alternative_names)
            .any(|name| match name.strip_prefix("*.") {
                Some(suffix) => host
                    .split_once('.')
                    .is_some_and(|(label, rest)| !label.is_empty() && rest == suffix),
                None => *name == host,
            })
    }
}
