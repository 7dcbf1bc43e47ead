//! Bootstrap script templating.
//!
//! # Data Flow
//! ```text
//! BootstrapParams (resolved infrastructure identifiers)
//!     → context.rs (TemplateContext keyed by the required-key schema)
//!
//! template text
//!     → renderer.rs parse (literal / placeholder segments, syntax check)
//!     → check every placeholder against the context
//!     → single substitution pass
//!     → RenderedScript
//! ```
//!
//! # Design Decisions
//! - Placeholders are `{{NAME}}` so they never collide with shell `$VAR`
//! - Strict: a missing value is an error, never left in the output
//! - Values are inserted verbatim (no escaping, no trimming)

pub mod context;
pub mod renderer;

pub use context::{BootstrapParams, TemplateContext, BOOTSTRAP_KEYS};
pub use renderer::{render, render_declared, RenderedScript, Template};
