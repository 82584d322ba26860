//! Client configuration: where the API lives and how the pipeline talks to it.
//!
//! [`ClientDescriptor`] is plain, serializable data validated by
//! [`ClientDescriptorBuilder`]. It names the API base URL, the endpoint paths the pipeline
//! depends on, the nonce header, the unauthenticated entry point used by the fallback
//! policy, and the fixed grace period observed before that fallback fires.

/// Builder API for assembling client descriptors.
pub mod builder;
/// Endpoint path table.
pub mod endpoints;

pub use builder::*;
pub use endpoints::*;

// crates.io
use ::http::HeaderName;
// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable client descriptor consumed by [`ApiClient`](crate::client::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDescriptor {
	/// Base URL every endpoint path is appended to.
	pub base_url: Url,
	/// Endpoint paths exposed by the API.
	pub endpoints: ApiEndpoints,
	/// Header carrying the single-use nonce on mutating calls.
	pub nonce_header: String,
	/// Unauthenticated entry point the fallback policy redirects to.
	pub login_route: String,
	/// Fixed wait observed before the fallback policy clears the session.
	pub grace_period: Duration,
}
impl ClientDescriptor {
	/// Default nonce header name.
	pub const DEFAULT_NONCE_HEADER: &'static str = "x-nonce";
	/// Default unauthenticated entry point.
	pub const DEFAULT_LOGIN_ROUTE: &'static str = "/auth/login";
	/// Default fallback grace period.
	pub const DEFAULT_GRACE_PERIOD: Duration = Duration::seconds(25);

	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ClientDescriptorBuilder {
		ClientDescriptorBuilder::new(base_url)
	}

	/// Resolves `path` against the base URL, keeping any base path prefix intact.
	pub fn url_for(&self, path: &str) -> Result<Url, ConfigError> {
		let mut raw = self.base_url.as_str().trim_end_matches('/').to_owned();

		raw.push_str(path);

		Url::parse(&raw).map_err(|source| ConfigError::InvalidPath { path: path.into(), source })
	}

	/// Parses the configured nonce header name.
	pub fn nonce_header_name(&self) -> Result<HeaderName, ConfigError> {
		HeaderName::from_bytes(self.nonce_header.as_bytes()).map_err(|_| {
			DescriptorError::InvalidNonceHeader { header: self.nonce_header.clone() }.into()
		})
	}
}
