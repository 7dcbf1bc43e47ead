//! Service bindings.
//!
//! # Responsibilities
//! - Represent one routable service exposed by the node (subdomain → port)
//! - Validate subdomain labels and port range
//! - Derive the fully qualified host and the logical id stem

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Highest port number a binding may use.
pub const MAX_PORT: u32 = 65_535;

const MAX_LABEL_LEN: usize = 63;

/// A public subdomain mapped to a backend port on the compute node.
///
/// Fields are private so a binding is immutable once constructed. The
/// port is kept wide so that an out-of-range value read from config is
/// reported by the compiler instead of being truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ServiceBinding {
    subdomain: String,
    port: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ServiceBinding {
    pub fn new(subdomain: impl Into<String>, port: u32) -> Self {
        Self {
            subdomain: subdomain.into(),
            port,
            description: None,
        }
    }

    /// Attach a human readable description ("ClearML Web UI").
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn port(&self) -> u32 {
        self.port
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Validated port as a `u16`.
    pub fn checked_port(&self) -> Result<u16, RoutingError> {
        if self.port == 0 || self.port > MAX_PORT {
            return Err(RoutingError::InvalidPort { port: self.port });
        }
        Ok(self.port as u16)
    }

    /// Check that the subdomain is a dot-separated sequence of DNS labels.
    pub fn validate_subdomain(&self) -> Result<(), RoutingError> {
        let invalid = |reason: &str| RoutingError::InvalidSubdomain {
            subdomain: self.subdomain.clone(),
            reason: reason.to_string(),
        };

        if self.subdomain.is_empty() {
            return Err(invalid("must not be empty"));
        }

        for label in self.subdomain.split('.') {
            if label.is_empty() {
                return Err(invalid("empty label"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(invalid("label longer than 63 characters"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("label starts or ends with a hyphen"));
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid("labels may only contain letters, digits and hyphens"));
            }
        }
        Ok(())
    }

    /// `subdomain.base_domain`, lowercased.
    pub fn fully_qualified_host(&self, base_domain: &str) -> String {
        format!("{}.{}", self.subdomain, base_domain).to_ascii_lowercase()
    }

    /// Stem for the logical ids of every artifact derived from this binding.
    pub fn logical_id(&self) -> String {
        self.subdomain.to_ascii_lowercase().replace('.', "-")
    }
}
