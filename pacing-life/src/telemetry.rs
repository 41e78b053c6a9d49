//! Telemetry sink that emits fired events as structured log records.

use tracing::info;

use pacing_core::TelemetrySink;

/// Logs every selected event under the `pacing::telemetry` target, where a
/// subscriber layer can route it to analytics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record_event(&self, id: &str, tag: &str, age: u32) {
        info!(target: "pacing::telemetry", id, tag, age, "Event fired");
    }
}
