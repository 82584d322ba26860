//! Authenticated API client: the request dispatcher and the typed operations built on it.
//!
//! [`ApiClient`] owns the transport, the client descriptor, the shared
//! [`CredentialStore`], and the refresh machinery. Every operation goes through
//! [`ApiClient::execute`], which attaches the current credential and transparently recovers
//! exactly one expired-credential rejection per request. Mutating operations fetch a fresh
//! nonce first and never dispatch when that fetch fails.

mod common;
mod dispatch;
mod nonce;
mod price;
mod refresh;
mod session;
mod wallet;

// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ClientDescriptor,
	fallback::{FallbackPolicy, LoginRedirect, NoopRedirect},
	http::Transport,
	refresh::{RefreshCoordinator, RefreshMetrics},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Entry point for every authenticated call against one API.
///
/// Cloning is cheap and clones share the transport, the credential store, and the refresh
/// coordinator, so a single refresh cycle serves every clone.
pub struct ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Base URL, endpoint paths, and fallback settings.
	pub descriptor: Arc<ClientDescriptor>,
	/// Shared holder of the current access credential.
	pub credentials: Arc<CredentialStore>,
	/// Counters describing refresh cycles.
	pub refresh_metrics: Arc<RefreshMetrics>,
	fallback: Arc<FallbackPolicy>,
	coordinator: Arc<RefreshCoordinator>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Creates a client over a caller-provided transport with an empty credential store.
	///
	/// The fallback policy starts with a [`NoopRedirect`]; install the UI's navigation hook
	/// with [`ApiClient::with_login_redirect`].
	pub fn with_transport(descriptor: ClientDescriptor, transport: impl Into<Arc<T>>) -> Self {
		let descriptor = Arc::new(descriptor);
		let credentials = Arc::new(CredentialStore::default());
		let refresh_metrics = Arc::new(RefreshMetrics::default());
		let (fallback, coordinator) = assemble_refresh(
			&descriptor,
			&credentials,
			&refresh_metrics,
			Arc::new(NoopRedirect),
		);

		Self {
			transport: transport.into(),
			descriptor,
			credentials,
			refresh_metrics,
			fallback,
			coordinator,
		}
	}

	/// Installs the navigation hook invoked when a session cannot be refreshed.
	///
	/// The hook is swapped inside the shared fallback policy, so clones made before this call
	/// use it too and keep sharing one refresh coordinator.
	pub fn with_login_redirect(self, redirect: Arc<dyn LoginRedirect>) -> Self {
		self.fallback.set_redirect(redirect);

		self
	}

	/// Seeds the credential store, e.g. with a token restored by the host application.
	pub fn with_credential(self, credential: Credential) -> Self {
		self.credentials.replace(credential);

		self
	}

	/// Returns `true` while the store holds a credential.
	pub fn is_authenticated(&self) -> bool {
		self.credentials.is_authenticated()
	}

	/// Returns the refresh coordinator shared by every clone of this client.
	pub fn coordinator(&self) -> &RefreshCoordinator {
		&self.coordinator
	}

	/// Returns the fallback policy engaged after failed refresh cycles.
	pub fn fallback(&self) -> &FallbackPolicy {
		&self.fallback
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a reqwest transport with a cookie jar.
	pub fn new(descriptor: ClientDescriptor) -> Result<Self> {
		Ok(Self::with_transport(descriptor, ReqwestTransport::new()?))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			credentials: self.credentials.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			fallback: self.fallback.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("descriptor", &self.descriptor)
			.field("authenticated", &self.is_authenticated())
			.field("coordinator", &self.coordinator)
			.finish()
	}
}

fn assemble_refresh(
	descriptor: &ClientDescriptor,
	credentials: &Arc<CredentialStore>,
	metrics: &Arc<RefreshMetrics>,
	redirect: Arc<dyn LoginRedirect>,
) -> (Arc<FallbackPolicy>, Arc<RefreshCoordinator>) {
	let fallback = Arc::new(FallbackPolicy::new(
		credentials.clone(),
		redirect,
		descriptor.login_route.clone(),
		descriptor.grace_period,
	));
	let coordinator =
		Arc::new(RefreshCoordinator::new(credentials.clone(), fallback.clone(), metrics.clone()));

	(fallback, coordinator)
}
