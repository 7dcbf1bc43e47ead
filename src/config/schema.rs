//! Configuration schema definitions.
//!
//! This module defines the deployment configuration read from TOML.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::routing::binding::ServiceBinding;
use crate::routing::rule::{HealthCheckPort, TargetGroupOptions};
use crate::security::ingress::IngressRule;

/// Root configuration for one deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Hosted zone every subdomain is placed under (e.g. "example.org").
    pub base_domain: String,

    /// Priority given to the first binding; the rest follow in order.
    pub starting_priority: u32,

    /// Services exposed by the node, in routing order.
    pub bindings: Vec<ServiceBinding>,

    /// Target group health check settings.
    pub health_check: HealthCheckConfig,

    /// HTTPS listener settings.
    pub listener: ListenerConfig,

    /// Ingress rules opened in addition to the binding ports.
    pub extra_ingress: Vec<IngressRule>,

    /// Bootstrap script inputs.
    pub bootstrap: BootstrapConfig,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            base_domain: String::new(),
            starting_priority: 1,
            bindings: Vec::new(),
            health_check: HealthCheckConfig::default(),
            listener: ListenerConfig::default(),
            extra_ingress: Vec::new(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path to probe.
    pub path: String,

    /// Probe this port on every target group instead of the traffic port.
    pub port: Option<u32>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            port: None,
        }
    }
}

impl HealthCheckConfig {
    /// Target group options for the compiler. A fixed port outside
    /// 1-65535 or a relative path is rejected.
    pub fn target_group_options(&self) -> Result<TargetGroupOptions, RoutingError> {
        let health_check_port = match self.port {
            None => HealthCheckPort::TrafficPort,
            Some(port) => match u16::try_from(port) {
                Ok(fixed) if fixed != 0 => HealthCheckPort::Fixed(fixed),
                _ => return Err(RoutingError::InvalidPort { port }),
            },
        };
        if !self.path.starts_with('/') {
            return Err(RoutingError::InvalidHealthCheckPath {
                path: self.path.clone(),
            });
        }
        Ok(TargetGroupOptions {
            health_check_path: self.path.clone(),
            health_check_port,
            ..TargetGroupOptions::default()
        })
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// HTTPS listener port.
    pub https_port: u16,

    /// Add a plain HTTP listener that redirects to HTTPS.
    pub redirect_http: bool,

    /// Port of the redirect listener.
    pub http_port: u16,

    /// Certificate to attach, if already issued.
    pub certificate_arn: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            https_port: 443,
            redirect_http: true,
            http_port: 80,
            certificate_arn: None,
        }
    }
}

/// Bootstrap template inputs. Paths are relative to the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Bootstrap script template.
    pub template_path: PathBuf,

    /// Compose file materialized on the node.
    pub compose_path: PathBuf,

    pub account_id: String,

    /// Empty means `AWS_REGION`, then `us-west-2`.
    pub region: String,

    pub stack_name: String,

    /// Logical id of the compute instance, used by the init helper.
    pub logical_resource_id: String,

    /// Wait-condition handle signalled when the node is ready.
    pub wait_handle: String,

    pub backup_image_uri: String,

    pub restore_from_backup: bool,
}
