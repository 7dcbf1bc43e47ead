//! Metrics collection.
//!
//! # Metrics
//! - `deploy_plan_rules_compiled_total` (counter): rules emitted by the compiler
//! - `deploy_plan_scripts_rendered_total` (counter): successful renders
//! - `deploy_plan_errors_total` (counter): failures, labelled by `stage`
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; no recorder is installed here, so the
//!   calls are no-ops unless the embedding process installs one

pub fn record_rules_compiled(count: usize) {
    ::metrics::counter!("deploy_plan_rules_compiled_total").increment(count as u64);
}

pub fn record_script_rendered() {
    ::metrics::counter!("deploy_plan_scripts_rendered_total").increment(1);
}

pub fn record_error(stage: &'static str) {
    ::metrics::counter!("deploy_plan_errors_total", "stage" => stage).increment(1);
}
