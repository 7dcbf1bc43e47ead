//! Routing-table compiler and bootstrap renderer for a single-node
//! experiment-tracking deployment.
//!
//! Produces immutable artifacts (listener rules, target groups, DNS alias
//! records, certificate names, ingress rules, the node's first-boot script)
//! that a separate provisioning step applies.

pub mod config;
pub mod dns;
pub mod error;
pub mod observability;
pub mod plan;
pub mod routing;
pub mod security;
pub mod template;

pub use config::DeploymentConfig;
pub use error::{PlanError, RenderError, RoutingError};
pub use plan::DeploymentPlan;
pub use routing::{compile, compile_rules, RoutingRule, ServiceBinding};
pub use template::{render, RenderedScript, TemplateContext};
