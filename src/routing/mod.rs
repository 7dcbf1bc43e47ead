//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceBinding[] + base domain + starting priority
//!     → binding.rs (validate subdomain labels and ports)
//!     → compiler.rs (assign priorities, derive hosts and target groups)
//!     → RoutingRule[] (immutable value objects)
//!
//! Attachment:
//!     ListenerSpec + RoutingRule[]
//!     → listener.rs (priority uniqueness, host disjointness)
//!     → RoutingTable
//!     → matcher.rs (host lookup for resolve())
//! ```
//!
//! # Design Decisions
//! - Routes compiled once per deployment, never updated in place
//! - Deterministic: same input always yields the same rules
//! - First match wins (ordered by priority), default action last

pub mod binding;
pub mod compiler;
pub mod listener;
pub mod matcher;
pub mod rule;

pub use binding::ServiceBinding;
pub use compiler::{compile, compile_rules};
pub use listener::{ListenerSpec, Resolution, RoutingTable, DEFAULT_RULE_PRIORITY};
pub use rule::{HealthCheckPort, Protocol, RoutingRule, TargetGroupOptions, TargetGroupSpec};
