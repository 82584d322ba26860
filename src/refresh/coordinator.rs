// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	fallback::FallbackPolicy,
	obs,
	refresh::{RefreshError, RefreshMetrics, RefreshOutcome, RefreshState},
	store::{CredentialStore, Generation},
};

type Subscriber = oneshot::Sender<RefreshOutcome>;

#[derive(Debug, Default)]
struct CoordinatorState {
	phase: RefreshState,
	subscribers: VecDeque<Subscriber>,
}

struct Shared {
	state: Mutex<CoordinatorState>,
	store: Arc<CredentialStore>,
	fallback: Arc<FallbackPolicy>,
	metrics: Arc<RefreshMetrics>,
}
impl Shared {
	/// Ends the running cycle and releases every subscriber with `outcome`, oldest first.
	fn release(&self, outcome: RefreshOutcome) -> usize {
		let subscribers = {
			let mut state = self.state.lock();

			state.phase = RefreshState::Idle;

			std::mem::take(&mut state.subscribers)
		};
		let released = subscribers.len();

		for subscriber in subscribers {
			// A dropped receiver means the caller gave up; nothing to deliver.
			let _ = subscriber.send(outcome.clone());
		}

		obs::record_refresh_fan_out(released);

		released
	}
}

enum Role {
	Leader(oneshot::Receiver<RefreshOutcome>),
	Follower(oneshot::Receiver<RefreshOutcome>),
	Settled(Credential),
}

/// Ensures at most one refresh runs at a time and fans its outcome out to every waiter.
///
/// All reads and writes of the refresh state and the subscriber queue happen inside one
/// `parking_lot` critical section that is never held across an `.await`, so the coordinator
/// stays correct on multi-threaded executors.
///
/// A cycle runs on its own tokio task. The caller that starts it is just the first
/// subscriber, so dropping any caller (the first one included) only drops that caller's
/// receiver; the refresh, the release of the remaining subscribers, and the fallback after a
/// failure always run to completion. Cloning yields a handle to the same coordinator.
#[derive(Clone)]
pub struct RefreshCoordinator(Arc<Shared>);
impl RefreshCoordinator {
	/// Creates an idle coordinator writing refreshed credentials into `store`.
	pub fn new(
		store: Arc<CredentialStore>,
		fallback: Arc<FallbackPolicy>,
		metrics: Arc<RefreshMetrics>,
	) -> Self {
		Self(Arc::new(Shared { state: Default::default(), store, fallback, metrics }))
	}

	/// Returns the current refresh state.
	pub fn state(&self) -> RefreshState {
		self.0.state.lock().phase
	}

	/// Returns how many callers are waiting on the in-flight cycle.
	///
	/// Diagnostics only; the queue may change as soon as the lock is released.
	pub fn queued(&self) -> usize {
		self.0.state.lock().subscribers.len()
	}

	/// Returns the shared refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.0.metrics
	}

	/// Resolves with a credential newer than the one a caller saw rejected.
	///
	/// `observed` is the store generation the rejected request was sent with. When a refresh
	/// is already running the caller subscribes to it. When none is running and the store has
	/// already moved past `observed`, the stored credential is returned without a new cycle.
	/// Otherwise the caller subscribes first and then starts a new cycle that drives the
	/// future returned by `refresh` on a spawned task.
	///
	/// On success the credential is written to the store once, then every subscriber is
	/// released with it in FIFO order. On failure every subscriber is released with the same
	/// [`RefreshError`], after which the cycle task runs the fallback policy once.
	///
	/// Must be called from within a tokio runtime.
	pub async fn await_fresh_credential<F, Fut>(
		&self,
		observed: Generation,
		refresh: F,
	) -> RefreshOutcome
	where
		F: FnOnce() -> Fut,
		Fut: 'static + Send + Future<Output = RefreshOutcome>,
	{
		let role = {
			let mut state = self.0.state.lock();

			match state.phase {
				RefreshState::Refreshing => {
					let (tx, rx) = oneshot::channel();

					state.subscribers.push_back(tx);
					self.0.metrics.record_coalesced();
					obs::refresh_coalesced(state.subscribers.len());

					Role::Follower(rx)
				},
				RefreshState::Idle => match self.0.store.newer_than(observed) {
					Some(credential) => Role::Settled(credential),
					None => {
						let (tx, rx) = oneshot::channel();

						state.phase = RefreshState::Refreshing;
						state.subscribers.push_back(tx);

						Role::Leader(rx)
					},
				},
			}
		};
		let rx = match role {
			Role::Settled(credential) => {
				self.0.metrics.record_reused();
				obs::credential_reused(self.0.store.generation().get());

				return Ok(credential);
			},
			Role::Leader(rx) => {
				tokio::spawn(run_cycle(self.0.clone(), refresh()));

				rx
			},
			Role::Follower(rx) => rx,
		};

		rx.await.unwrap_or(Err(RefreshError::Abandoned))
	}
}
impl Debug for RefreshCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.0.state.lock();

		f.debug_struct("RefreshCoordinator")
			.field("state", &state.phase)
			.field("queued", &state.subscribers.len())
			.finish()
	}
}

async fn run_cycle<Fut>(shared: Arc<Shared>, refresh: Fut)
where
	Fut: Future<Output = RefreshOutcome>,
{
	let mut cycle = Cycle { shared: &shared, finished: false };

	shared.metrics.record_attempt();
	obs::refresh_started();

	match refresh.await {
		Ok(credential) => {
			shared.store.replace(credential.clone());
			shared.metrics.record_success();

			let released = cycle.finish(Ok(credential.clone()));

			obs::refresh_succeeded(&credential.fingerprint(), released);
		},
		Err(err) => {
			shared.metrics.record_failure();

			let released = cycle.finish(Err(err.clone()));

			obs::refresh_failed(&err, released);
			shared.fallback.on_refresh_failure().await;
		},
	}
}

/// Releases subscribers if the cycle task is torn down before the refresh resolves.
///
/// Only runtime shutdown or a panicking refresh future can trigger it.
struct Cycle<'a> {
	shared: &'a Shared,
	finished: bool,
}
impl Cycle<'_> {
	fn finish(&mut self, outcome: RefreshOutcome) -> usize {
		self.finished = true;

		self.shared.release(outcome)
	}
}
impl Drop for Cycle<'_> {
	fn drop(&mut self) {
		if !self.finished {
			self.shared.metrics.record_failure();

			let released = self.shared.release(Err(RefreshError::Abandoned));

			obs::refresh_failed(&RefreshError::Abandoned, released);
		}
	}
}
