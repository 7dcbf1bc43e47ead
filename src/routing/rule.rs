//! Compiled routing artifacts.
//!
//! Plain value objects: the provisioning collaborator turns them into
//! listener rules and target groups. Nothing here talks to a cloud API.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Load balancer protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

/// Which port the target group's health check probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCheckPort {
    /// Probe the same port that receives traffic.
    #[default]
    TrafficPort,
    /// Probe one fixed port for every target group.
    Fixed(u16),
}

impl HealthCheckPort {
    pub fn resolve(self, traffic_port: u16) -> u16 {
        match self {
            HealthCheckPort::TrafficPort => traffic_port,
            HealthCheckPort::Fixed(port) => port,
        }
    }
}

/// Knobs applied to every target group a compile call produces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetGroupOptions {
    pub protocol: Protocol,
    pub health_check_path: String,
    pub health_check_port: HealthCheckPort,
}

impl Default for TargetGroupOptions {
    fn default() -> Self {
        Self {
            protocol: Protocol::Http,
            health_check_path: "/".to_string(),
            health_check_port: HealthCheckPort::TrafficPort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckSpec {
    pub enabled: bool,
    pub path: String,
    pub port: u16,
    pub protocol: Protocol,
}

/// Backend target for one rule. Never shared between rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetGroupSpec {
    pub name: String,
    pub port: u16,
    pub protocol: Protocol,
    pub health_check: HealthCheckSpec,
}

/// Forward matched traffic to the named target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardAction {
    pub target_group: String,
}

/// A resolved host-header rule on the shared HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingRule {
    pub logical_id: String,
    pub fully_qualified_host: String,
    pub priority: u32,
    pub condition_hosts: BTreeSet<String>,
    pub target_group: TargetGroupSpec,
    pub action: ForwardAction,
}

impl RoutingRule {
    /// Id of the listener action this rule becomes.
    pub fn action_id(&self) -> String {
        format!("{}-listener-action", self.logical_id)
    }

    pub fn backend_port(&self) -> u16 {
        self.target_group.port
    }
}
