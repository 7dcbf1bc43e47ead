//! Ingress rules for the node's security group.
//!
//! # Responsibilities
//! - Open one TCP port per distinct backend port the bindings use
//! - Append operator-supplied extras (e.g. SSH)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::binding::ServiceBinding;

/// Source range every generated rule allows.
pub const ANY_IPV4: &str = "0.0.0.0/0";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IngressRule {
    pub port: u16,
    #[serde(default = "default_peer")]
    pub peer: String,
    #[serde(default)]
    pub description: String,
}

fn default_peer() -> String {
    ANY_IPV4.to_string()
}

/// One rule per distinct binding port (ascending), then `extra` in order.
///
/// When several bindings share a port the first one's description wins.
/// Bindings with out-of-range ports are skipped; the compiler rejects them.
pub fn ingress_rules(bindings: &[ServiceBinding], extra: &[IngressRule]) -> Vec<IngressRule> {
    let mut by_port: BTreeMap<u16, &ServiceBinding> = BTreeMap::new();
    for binding in bindings {
        if let Ok(port) = binding.checked_port() {
            by_port.entry(port).or_insert(binding);
        }
    }

    let mut rules: Vec<IngressRule> = by_port
        .into_iter()
        .map(|(port, binding)| IngressRule {
            port,
            peer: default_peer(),
            description: binding
                .description()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} backend", binding.subdomain())),
        })
        .collect();

    for rule in extra {
        if !rules.iter().any(|r| r.port == rule.port && r.peer == rule.peer) {
            rules.push(rule.clone());
        }
    }
    rules
}
