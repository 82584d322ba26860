//! Optional observability helpers for pipeline operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `session_broker.operation`
//!   with the `operation` and `stage` (call site) fields, plus events for refresh coalescing,
//!   refresh failures, replays, and fallback engagement.
//! - Enable `metrics` to increment the `session_broker_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`. Refresh cycles also record the
//!   `session_broker_refresh_fan_out` histogram and fallbacks bump `session_broker_fallback_total`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Request dispatch, including the single refresh-retry.
	Dispatch,
	/// Refresh call issued by the coordinator.
	Refresh,
	/// Nonce acquisition ahead of a mutating call.
	Nonce,
	/// Login, logout, and email verification.
	Session,
	/// Wallet reads and mutations.
	Wallet,
	/// Price history lookups.
	Price,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Dispatch => "dispatch",
			OperationKind::Refresh => "refresh",
			OperationKind::Nonce => "nonce",
			OperationKind::Session => "session",
			OperationKind::Wallet => "wallet",
			OperationKind::Price => "price",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a pipeline operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span, recording attempt and outcome.
pub(crate) async fn observe<T, E, Fut>(
	kind: OperationKind,
	stage: &'static str,
	fut: Fut,
) -> Result<T, E>
where
	Fut: Future<Output = Result<T, E>>,
{
	let span = OperationSpan::new(kind, stage);

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(_) => record_operation_outcome(kind, OperationOutcome::Failure),
	}

	result
}
