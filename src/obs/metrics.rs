// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"session_broker_operation_total",
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records how many waiting callers one refresh cycle released.
pub fn record_refresh_fan_out(released: usize) {
	#[cfg(feature = "metrics")]
	metrics::histogram!("session_broker_refresh_fan_out").record(released as f64);
	#[cfg(not(feature = "metrics"))]
	let _ = released;
}

/// Counts forced re-login fallbacks.
pub fn record_fallback_engaged() {
	#[cfg(feature = "metrics")]
	metrics::counter!("session_broker_fallback_total").increment(1);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_a_global_recorder() {
		record_operation_outcome(OperationKind::Refresh, OperationOutcome::Failure);
		record_refresh_fan_out(5);
		record_fallback_engaged();
	}
}
