//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, resolve paths and region)
//!     → validation.rs (semantic checks)
//!     → DeploymentConfig (validated, immutable)
//!     → plan (compile routes, render bootstrap script)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; one config drives one deployment
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_bootstrap_sources, BootstrapSources, ConfigError};
pub use schema::BootstrapConfig;
pub use schema::DeploymentConfig;
pub use schema::HealthCheckConfig;
pub use schema::ListenerConfig;
