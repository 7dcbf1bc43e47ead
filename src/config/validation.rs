//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, priorities)
//! - Detect colliding subdomains before compilation
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeploymentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::schema::DeploymentConfig;
use crate::routing::compiler::normalize_base_domain;
use crate::routing::listener::DEFAULT_RULE_PRIORITY;

/// One semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check the whole config, collecting every problem found.
pub fn validate_config(config: &DeploymentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_domain = match normalize_base_domain(&config.base_domain) {
        Ok(domain) => Some(domain),
        Err(e) => {
            errors.push(ValidationError::new("base_domain", e.to_string()));
            None
        }
    };

    validate_bindings(config, base_domain.as_deref(), &mut errors);
    validate_listener(config, &mut errors);
    validate_bootstrap(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_bindings(config: &DeploymentConfig, base_domain: Option<&str>, errors: &mut Vec<ValidationError>) {
    if config.bindings.is_empty() {
        errors.push(ValidationError::new("bindings", "at least one binding is required"));
    }

    if config.starting_priority == 0 {
        errors.push(ValidationError::new("starting_priority", "must be at least 1"));
    } else {
        let last = u64::from(config.starting_priority) + config.bindings.len().max(1) as u64 - 1;
        if last >= u64::from(DEFAULT_RULE_PRIORITY) {
            errors.push(ValidationError::new(
                "starting_priority",
                format!("rule priorities would reach {last}, limit is {}", DEFAULT_RULE_PRIORITY - 1),
            ));
        }
    }

    let mut hosts = BTreeSet::new();
    for (i, binding) in config.bindings.iter().enumerate() {
        if let Err(e) = binding.validate_subdomain() {
            errors.push(ValidationError::new(format!("bindings[{i}].subdomain"), e.to_string()));
        }
        if let Err(e) = binding.checked_port() {
            errors.push(ValidationError::new(format!("bindings[{i}].port"), e.to_string()));
        }
        if let Some(domain) = base_domain {
            let host = binding.fully_qualified_host(domain);
            if !hosts.insert(host.clone()) {
                errors.push(ValidationError::new(
                    format!("bindings[{i}].subdomain"),
                    format!("duplicate subdomain: {host}"),
                ));
            }
        }
    }

    if let Some(port) = config.health_check.port {
        if port == 0 || port > 65_535 {
            errors.push(ValidationError::new("health_check.port", format!("invalid port {port}")));
        }
    }
    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::new("health_check.path", "must start with '/'"));
    }
}

fn validate_listener(config: &DeploymentConfig, errors: &mut Vec<ValidationError>) {
    let listener = &config.listener;
    if listener.https_port == 0 {
        errors.push(ValidationError::new("listener.https_port", "must be non-zero"));
    }
    if listener.redirect_http {
        if listener.http_port == 0 {
            errors.push(ValidationError::new("listener.http_port", "must be non-zero"));
        } else if listener.http_port == listener.https_port {
            errors.push(ValidationError::new(
                "listener.http_port",
                "redirect listener cannot share the HTTPS port",
            ));
        }
    }
    for (i, rule) in config.extra_ingress.iter().enumerate() {
        if rule.port == 0 {
            errors.push(ValidationError::new(format!("extra_ingress[{i}].port"), "must be non-zero"));
        }
    }
}

fn validate_bootstrap(config: &DeploymentConfig, errors: &mut Vec<ValidationError>) {
    let bootstrap = &config.bootstrap;

    if bootstrap.template_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("bootstrap.template_path", "is required"));
    }
    if bootstrap.compose_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("bootstrap.compose_path", "is required"));
    }

    if bootstrap.account_id.len() != 12 || !bootstrap.account_id.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::new("bootstrap.account_id", "must be a 12 digit account id"));
    }

    for (field, value) in [
        ("bootstrap.region", &bootstrap.region),
        ("bootstrap.stack_name", &bootstrap.stack_name),
        ("bootstrap.logical_resource_id", &bootstrap.logical_resource_id),
        ("bootstrap.wait_handle", &bootstrap.wait_handle),
        ("bootstrap.backup_image_uri", &bootstrap.backup_image_uri),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }
}
