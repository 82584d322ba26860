// self
use crate::{_prelude::*, obs::OperationKind, refresh::RefreshError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by pipeline operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("session_broker.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn refresh_started() {
	#[cfg(feature = "tracing")]
	tracing::debug!("credential expired; starting refresh cycle");
}

pub(crate) fn refresh_coalesced(queued: usize) {
	#[cfg(feature = "tracing")]
	tracing::debug!(queued, "refresh already in flight; subscribed to the running cycle");
	#[cfg(not(feature = "tracing"))]
	let _ = queued;
}

pub(crate) fn credential_reused(generation: u64) {
	#[cfg(feature = "tracing")]
	tracing::debug!(generation, "a newer credential is already stored; skipping refresh");
	#[cfg(not(feature = "tracing"))]
	let _ = generation;
}

pub(crate) fn refresh_succeeded(fingerprint: &str, released: usize) {
	#[cfg(feature = "tracing")]
	tracing::info!(fingerprint, released, "credential refreshed");
	#[cfg(not(feature = "tracing"))]
	let _ = (fingerprint, released);
}

pub(crate) fn refresh_failed(error: &RefreshError, released: usize) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%error, released, "credential refresh failed");
	#[cfg(not(feature = "tracing"))]
	let _ = (error, released);
}

pub(crate) fn replaying(method: &str, path: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(method, path, "replaying request with refreshed credential");
	#[cfg(not(feature = "tracing"))]
	let _ = (method, path);
}

pub(crate) fn fallback_engaged(route: &str, grace: Duration) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		route,
		grace_ms = grace.whole_milliseconds() as u64,
		"session unrecoverable; forcing re-login after grace period"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (route, grace);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn events_are_safe_without_a_subscriber() {
		refresh_started();
		refresh_coalesced(3);
		refresh_failed(&RefreshError::Abandoned, 3);
		fallback_engaged("/auth/login", Duration::seconds(1));
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
