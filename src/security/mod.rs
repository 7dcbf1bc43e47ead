//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceBinding[] + operator extras
//!     → ingress.rs (one TCP rule per distinct backend port)
//!     → IngressRule[] for the node's security group
//! ```
//!
//! # Design Decisions
//! - Only ports that some binding routes to are opened
//! - Extras (SSH) are explicit config, never implied

pub mod ingress;

pub use ingress::{ingress_rules, IngressRule};
