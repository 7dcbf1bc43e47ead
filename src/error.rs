//! Error taxonomy for compiling routes and rendering bootstrap scripts.
//!
//! Every variant describes a configuration defect. None of them are
//! retryable: the caller must surface them to the operator before any
//! infrastructure is touched.

use thiserror::Error;

/// Errors produced while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The template references a placeholder with no value in the context.
    #[error("missing template parameter: {name}")]
    MissingParameter { name: String },

    /// A `{{` at this byte offset does not open a well-formed placeholder.
    #[error("malformed placeholder at byte offset {offset}")]
    MalformedPlaceholder { offset: usize },

    /// The template references a name outside the declared key set.
    #[error("placeholder {name} is not a declared parameter")]
    UnknownPlaceholder { name: String },
}

/// Errors produced while compiling or attaching routing rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Nothing to route.
    #[error("no service bindings supplied")]
    EmptyBindings,

    /// Port outside 1-65535.
    #[error("invalid port {port}: must be within 1-65535")]
    InvalidPort { port: u32 },

    /// Two bindings resolve to the same fully qualified host.
    #[error("duplicate subdomain: {subdomain}")]
    DuplicateSubdomain { subdomain: String },

    /// Subdomain is not a dot-separated sequence of DNS labels.
    #[error("invalid subdomain {subdomain:?}: {reason}")]
    InvalidSubdomain { subdomain: String, reason: String },

    /// Base domain does not parse as a DNS name.
    #[error("invalid base domain {domain:?}")]
    InvalidDomain { domain: String },

    /// Priority is zero or would run past the listener maximum.
    #[error("invalid rule priority {priority}")]
    InvalidPriority { priority: u64 },

    /// Health check path is not absolute.
    #[error("invalid health check path {path:?}: must start with '/'")]
    InvalidHealthCheckPath { path: String },

    /// Two rules on one listener share a priority.
    #[error("priority {priority} is already taken on this listener")]
    PriorityConflict { priority: u32 },
}

/// Any failure while assembling a full deployment plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

impl PlanError {
    /// Short stage label used for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            PlanError::Render(_) => "render",
            PlanError::Routing(_) => "routing",
        }
    }
}
