//! Listener configuration and rule attachment.
//!
//! # Responsibilities
//! - Describe the shared HTTPS listener and its default (not found) action
//! - Describe the HTTP → HTTPS redirect listener
//! - Enforce per-listener invariants when compiled rules are attached
//! - Resolve a Host header to the rule that would serve it
//!
//! # Design Decisions
//! - The default action is listener-level, never a compiled rule
//! - Compiled rules may not use the reserved default priority
//! - Explicit default fallback rather than a silent backend choice

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::RoutingError;
use crate::routing::matcher::{normalize_host, HostMatcher, Matcher};
use crate::routing::rule::{Protocol, RoutingRule};

/// Highest rule priority a listener accepts. Reserved for the default action.
pub const DEFAULT_RULE_PRIORITY: u32 = 50_000;

/// Static response returned when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedResponse {
    pub status_code: u16,
    pub content_type: String,
    pub message_body: String,
}

impl FixedResponse {
    pub fn not_found() -> Self {
        Self {
            status_code: 404,
            content_type: "text/plain".to_string(),
            message_body: "404 Not Found".to_string(),
        }
    }
}

/// Listener that redirects plain HTTP to the HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectSpec {
    pub source_protocol: Protocol,
    pub source_port: u16,
    pub target_protocol: Protocol,
    pub target_port: u16,
    pub open: bool,
}

/// The shared HTTPS listener that compiled rules attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerSpec {
    pub protocol: Protocol,
    pub port: u16,
    pub certificate_arn: Option<String>,
    pub default_priority: u32,
    pub default_action: FixedResponse,
    pub redirect: Option<RedirectSpec>,
}

impl ListenerSpec {
    /// HTTPS listener on `port` answering 404 by default.
    pub fn https(port: u16) -> Self {
        Self {
            protocol: Protocol::Https,
            port,
            certificate_arn: None,
            default_priority: DEFAULT_RULE_PRIORITY,
            default_action: FixedResponse::not_found(),
            redirect: None,
        }
    }

    pub fn with_certificate(mut self, arn: impl Into<String>) -> Self {
        self.certificate_arn = Some(arn.into());
        self
    }

    /// Add a plain HTTP listener on `source_port` redirecting here.
    pub fn with_http_redirect(mut self, source_port: u16) -> Self {
        self.redirect = Some(RedirectSpec {
            source_protocol: Protocol::Http,
            source_port,
            target_protocol: self.protocol,
            target_port: self.port,
            open: true,
        });
        self
    }
}

/// What a listener does with a request for a given host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Forward(&'a RoutingRule),
    Default(&'a FixedResponse),
}

/// Rules attached to one listener, ordered by priority.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingTable {
    listener: ListenerSpec,
    rules: Vec<RoutingRule>,
    #[serde(skip)]
    matchers: Vec<HostMatcher>,
}

impl RoutingTable {
    pub fn new(listener: ListenerSpec) -> Self {
        Self {
            listener,
            rules: Vec::new(),
            matchers: Vec::new(),
        }
    }

    /// Build a table for `listener` holding `rules`.
    pub fn attach(listener: ListenerSpec, rules: Vec<RoutingRule>) -> Result<Self, RoutingError> {
        let mut table = Self::new(listener);
        table.add_rules(rules)?;
        Ok(table)
    }

    /// Attach more rules, checking them against everything already attached.
    ///
    /// Validation runs over the whole batch first, so a failed call leaves
    /// the table unchanged.
    pub fn add_rules(&mut self, rules: Vec<RoutingRule>) -> Result<(), RoutingError> {
        self.check_rules(&rules)?;

        self.rules.extend(rules);
        self.rules.sort_by_key(|r| r.priority);
        self.matchers = self
            .rules
            .iter()
            .map(|r| HostMatcher::new(&r.condition_hosts))
            .collect();
        Ok(())
    }

    fn check_rules(&self, rules: &[RoutingRule]) -> Result<(), RoutingError> {
        let mut priorities: BTreeSet<u32> = self.rules.iter().map(|r| r.priority).collect();
        let mut hosts: BTreeSet<String> = self
            .rules
            .iter()
            .flat_map(|r| r.condition_hosts.iter().map(|h| normalize_host(h)))
            .collect();

        for rule in rules {
            if rule.priority == 0 || rule.priority >= self.listener.default_priority {
                return Err(RoutingError::InvalidPriority {
                    priority: u64::from(rule.priority),
                });
            }
            if !priorities.insert(rule.priority) {
                return Err(RoutingError::PriorityConflict {
                    priority: rule.priority,
                });
            }
            for host in &rule.condition_hosts {
                let host = normalize_host(host);
                if hosts.contains(&host) {
                    return Err(RoutingError::DuplicateSubdomain { subdomain: host });
                }
                hosts.insert(host);
            }
        }
        Ok(())
    }

    pub fn listener(&self) -> &ListenerSpec {
        &self.listener
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// First matching rule by ascending priority, else the default action.
    pub fn resolve(&self, host: &str) -> Resolution<'_> {
        self.rules
            .iter()
            .zip(&self.matchers)
            .find(|(_, matcher)| matcher.matches(host))
            .map(|(rule, _)| Resolution::Forward(rule))
            .unwrap_or(Resolution::Default(&self.listener.default_action))
    }

    /// Host → backend port, for display and auditing.
    pub fn port_map(&self) -> BTreeMap<&str, u16> {
        self.rules
            .iter()
            .map(|r| (r.fully_qualified_host.as_str(), r.backend_port()))
            .collect()
    }
}
