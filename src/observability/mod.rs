//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / template / plan
//!     → logging.rs (structured tracing events, stderr)
//!     → metrics.rs (counters through the metrics facade)
//! ```

pub mod logging;
pub mod metrics;
