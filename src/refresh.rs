//! Single-flight credential refresh.
//!
//! [`RefreshCoordinator`] owns the refresh state machine (`Idle -> Refreshing -> Idle`) and
//! the FIFO queue of callers waiting on the in-flight cycle. Exactly one caller per cycle
//! runs the refresh; everyone who hits an expired credential while it runs subscribes and is
//! released with the same outcome. A failed cycle releases every subscriber with the failure
//! and engages the [`FallbackPolicy`](crate::fallback::FallbackPolicy) once.

mod coordinator;
mod metrics;

pub use coordinator::*;
pub use metrics::RefreshMetrics;

// self
use crate::_prelude::*;

/// Outcome broadcast to every subscriber of a refresh cycle.
pub type RefreshOutcome = Result<crate::auth::Credential, RefreshError>;

/// Refresh state observed by the coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshState {
	/// No refresh is running.
	#[default]
	Idle,
	/// A refresh is in flight; new expired-credential signals subscribe to it.
	Refreshing,
}

/// Failure of a single refresh cycle.
///
/// The error is `Clone` because one failure is delivered to every subscriber of the cycle.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// Refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the session with status {status}.")]
	Rejected {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
	},
	/// Refresh call never produced a response.
	#[error("Refresh call failed before a response was received: {reason}.")]
	Transport {
		/// Transport failure description.
		reason: String,
	},
	/// Refresh endpoint answered with a body that does not carry a usable credential.
	#[error("Refresh endpoint returned an unusable credential: {reason}.")]
	Malformed {
		/// Decode or validation failure description.
		reason: String,
	},
	/// The caller driving the cycle was dropped before the refresh finished.
	#[error("Refresh cycle was abandoned before it completed.")]
	Abandoned,
}
