//! Metrics collection.
//!
//! # Metrics
//! - `gateway_fallback_generated_total` (counter): fallback documents produced
//! - `gateway_fallback_entities_excised_total` (counter): entities removed from current configs
//! - `gateway_fallback_entities_recovered_total` (counter): entities restored from last known good
//! - `gateway_fallback_failures_total` (counter): failed generations by `reason`
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; installing an exporter is the embedder's job
//! - Without an installed recorder every call is a no-op

use metrics::counter;

pub const FALLBACK_GENERATED: &str = "gateway_fallback_generated_total";
pub const ENTITIES_EXCISED: &str = "gateway_fallback_entities_excised_total";
pub const ENTITIES_RECOVERED: &str = "gateway_fallback_entities_recovered_total";
pub const FALLBACK_FAILURES: &str = "gateway_fallback_failures_total";

pub fn record_fallback_generated(excised: usize, recovered: usize) {
    counter!(FALLBACK_GENERATED).increment(1);
    counter!(ENTITIES_EXCISED).increment(excised as u64);
    counter!(ENTITIES_RECOVERED).increment(recovered as u64);
}

pub fn record_fallback_failure(reason: &'static str) {
    counter!(FALLBACK_FAILURES, "reason" => reason).increment(1);
}
