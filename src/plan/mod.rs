//! Deployment plan assembly.
//!
//! # Data Flow
//! ```text
//! DeploymentConfig + template text + compose text
//!     → routing::compile (rules)
//!     → RoutingTable::attach (listener invariants)
//!     → dns (alias records, certificate names)
//!     → security (ingress rules)
//!     → template::render_declared (bootstrap script)
//!     → DeploymentPlan (serialized for the provisioning collaborator)
//! ```
//!
//! # Design Decisions
//! - Either the whole plan builds or nothing is returned
//! - The plan only describes resources; applying it happens elsewhere
//! - A new script always means a replaced node (`replaces_node`)

use serde::Serialize;

use crate::config::schema::DeploymentConfig;
use crate::dns::{dns_records, CertificateSpec, DnsRecordSpec};
use crate::error::PlanError;
use crate::observability::metrics;
use crate::routing::compiler::{compile, normalize_base_domain};
use crate::routing::listener::{ListenerSpec, RoutingTable};
use crate::security::ingress::{ingress_rules, IngressRule};
use crate::template::{render_declared, BootstrapParams, RenderedScript, TemplateContext, BOOTSTRAP_KEYS};

/// Rendered first-boot script plus its change-detection fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapArtifact {
    pub script: RenderedScript,
    /// SHA-256 hex of `script`.
    pub digest: String,
    /// The collaborator must replace the node whenever the digest changes.
    pub replaces_node: bool,
}

/// Everything the provisioning collaborator needs for one deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentPlan {
    pub base_domain: String,
    pub routing: RoutingTable,
    pub dns_records: Vec<DnsRecordSpec>,
    pub certificate: CertificateSpec,
    pub ingress: Vec<IngressRule>,
    pub bootstrap: BootstrapArtifact,
}

impl DeploymentPlan {
    /// Build the full plan. Fails on the first configuration defect.
    pub fn build(config: &DeploymentConfig, template: &str, compose_yaml: &str) -> Result<Self, PlanError> {
        let plan = Self::build_inner(config, template, compose_yaml);
        match &plan {
            Ok(plan) => tracing::info!(
                base_domain = %plan.base_domain,
                rules = plan.routing.rules().len(),
                digest = %plan.bootstrap.digest,
                "Deployment plan built"
            ),
            Err(e) => {
                tracing::error!(stage = e.stage(), error = %e, "Deployment plan rejected");
                metrics::record_error("plan");
            }
        }
        plan
    }

    fn build_inner(config: &DeploymentConfig, template: &str, compose_yaml: &str) -> Result<Self, PlanError> {
        let base_domain = normalize_base_domain(&config.base_domain)?;
        let routing = build_routing_table(config)?;
        let bootstrap = render_bootstrap(config, template, compose_yaml)?;

        Ok(Self {
            dns_records: dns_records(routing.rules()),
            certificate: CertificateSpec::covering(&base_domain, routing.rules()),
            ingress: ingress_rules(&config.bindings, &config.extra_ingress),
            base_domain,
            routing,
            bootstrap,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Compile the configured bindings and attach them to the HTTPS listener.
pub fn build_routing_table(config: &DeploymentConfig) -> Result<RoutingTable, PlanError> {
    let rules = compile(
        &config.bindings,
        &config.base_domain,
        config.starting_priority,
        &config.health_check.target_group_options()?,
    )?;

    let mut listener = ListenerSpec::https(config.listener.https_port);
    if let Some(arn) = &config.listener.certificate_arn {
        listener = listener.with_certificate(arn.clone());
    }
    if config.listener.redirect_http {
        listener = listener.with_http_redirect(config.listener.http_port);
    }

    Ok(RoutingTable::attach(listener, rules)?)
}

/// Render the bootstrap script from the configured parameters.
///
/// The template may only reference the documented bootstrap keys.
pub fn render_bootstrap(
    config: &DeploymentConfig,
    template: &str,
    compose_yaml: &str,
) -> Result<BootstrapArtifact, PlanError> {
    let bootstrap = &config.bootstrap;
    let context = TemplateContext::from(BootstrapParams {
        compose_yaml: compose_yaml.to_string(),
        account_id: bootstrap.account_id.clone(),
        region: bootstrap.region.clone(),
        stack_name: bootstrap.stack_name.clone(),
        logical_resource_id: bootstrap.logical_resource_id.clone(),
        wait_handle: bootstrap.wait_handle.clone(),
        backup_image_uri: bootstrap.backup_image_uri.clone(),
        restore_from_backup: bootstrap.restore_from_backup,
    });

    let script = render_declared(template, &context, &BOOTSTRAP_KEYS)?;

    Ok(BootstrapArtifact {
        digest: script.digest(),
        script,
        replaces_node: true,
    })
}
