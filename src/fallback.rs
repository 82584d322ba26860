//! Forced re-authentication once a session cannot be refreshed.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{_prelude::*, obs, store::CredentialStore};

/// Navigation hook owned by the UI layer.
///
/// Invoked once per failed refresh cycle with the unauthenticated entry point. Closures of
/// the shape `Fn(&str) + Send + Sync` implement the trait directly.
pub trait LoginRedirect
where
	Self: Send + Sync,
{
	/// Sends the user to `route`.
	fn redirect_to_login(&self, route: &str);
}
impl<F> LoginRedirect for F
where
	F: Fn(&str) + Send + Sync,
{
	fn redirect_to_login(&self, route: &str) {
		self(route)
	}
}

/// Redirect used when the host never installs one; the engagement is only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRedirect;
impl LoginRedirect for NoopRedirect {
	fn redirect_to_login(&self, _route: &str) {}
}

/// Policy applied after a refresh cycle fails.
///
/// Waits a fixed grace period (not cancellable), clears the credential store, then asks the
/// [`LoginRedirect`] to show the login entry point. The refresh coordinator calls
/// [`FallbackPolicy::on_refresh_failure`] once per failed cycle, regardless of how many
/// requests were waiting on it.
///
/// The redirect lives in a swappable slot so a hook installed after construction reaches
/// every holder of the policy.
pub struct FallbackPolicy {
	store: Arc<CredentialStore>,
	redirect: RwLock<Arc<dyn LoginRedirect>>,
	login_route: String,
	grace_period: Duration,
	engagements: AtomicU64,
}
impl FallbackPolicy {
	/// Creates a policy that clears `store` and redirects to `login_route`.
	pub fn new(
		store: Arc<CredentialStore>,
		redirect: Arc<dyn LoginRedirect>,
		login_route: impl Into<String>,
		grace_period: Duration,
	) -> Self {
		Self {
			store,
			redirect: RwLock::new(redirect),
			login_route: login_route.into(),
			grace_period: if grace_period.is_negative() { Duration::ZERO } else { grace_period },
			engagements: AtomicU64::new(0),
		}
	}

	/// Runs the fallback: grace wait, store clear, login redirect.
	pub async fn on_refresh_failure(&self) {
		self.engagements.fetch_add(1, Ordering::Relaxed);
		obs::record_fallback_engaged();
		obs::fallback_engaged(&self.login_route, self.grace_period);

		tokio::time::sleep(self.grace_period.unsigned_abs()).await;

		self.store.clear();

		let redirect = self.redirect.read().clone();

		redirect.redirect_to_login(&self.login_route);
	}

	/// Replaces the navigation hook used by later engagements.
	pub fn set_redirect(&self, redirect: Arc<dyn LoginRedirect>) {
		*self.redirect.write() = redirect;
	}

	/// Returns how many times the fallback has been engaged.
	pub fn engagements(&self) -> u64 {
		self.engagements.load(Ordering::Relaxed)
	}

	/// Returns the configured grace period.
	pub fn grace_period(&self) -> Duration {
		self.grace_period
	}

	/// Returns the unauthenticated entry point.
	pub fn login_route(&self) -> &str {
		&self.login_route
	}
}
impl Debug for FallbackPolicy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FallbackPolicy")
			.field("login_route", &self.login_route)
			.field("grace_period", &self.grace_period)
			.field("engagements", &self.engagements())
			.finish()
	}
}
