// self
use crate::{
	_prelude::*,
	config::{ApiEndpoints, ClientDescriptor},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum DescriptorError {
	/// Base URL must use `http` or `https`.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry a query string or fragment.
	#[error("Base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Base URL that failed validation.
		url: String,
	},
	/// Endpoint paths must be absolute.
	#[error("The {endpoint} endpoint path must start with '/': {path}.")]
	RelativeEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// Nonce header is not a valid HTTP header name.
	#[error("Nonce header `{header}` is not a valid HTTP header name.")]
	InvalidNonceHeader {
		/// Header name that failed validation.
		header: String,
	},
	/// Login route must be an absolute path.
	#[error("Login route must start with '/': {route}.")]
	RelativeLoginRoute {
		/// Route that failed validation.
		route: String,
	},
	/// Grace period cannot be negative.
	#[error("Grace period cannot be negative.")]
	NegativeGracePeriod,
}

/// Builder for [`ClientDescriptor`] values.
#[derive(Debug)]
pub struct ClientDescriptorBuilder {
	/// Base URL every endpoint path is appended to.
	pub base_url: Url,
	/// Endpoint paths exposed by the API.
	pub endpoints: ApiEndpoints,
	/// Header carrying the single-use nonce.
	pub nonce_header: String,
	/// Unauthenticated entry point for the fallback policy.
	pub login_route: String,
	/// Fallback grace period.
	pub grace_period: Duration,
}
impl ClientDescriptorBuilder {
	/// Creates a new builder seeded with defaults for everything but the base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			endpoints: ApiEndpoints::default(),
			nonce_header: ClientDescriptor::DEFAULT_NONCE_HEADER.into(),
			login_route: ClientDescriptor::DEFAULT_LOGIN_ROUTE.into(),
			grace_period: ClientDescriptor::DEFAULT_GRACE_PERIOD,
		}
	}

	/// Overrides the endpoint table.
	pub fn endpoints(mut self, endpoints: ApiEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the nonce header name.
	pub fn nonce_header(mut self, header: impl Into<String>) -> Self {
		self.nonce_header = header.into();

		self
	}

	/// Overrides the unauthenticated entry point.
	pub fn login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Overrides the fallback grace period (defaults to 25 seconds).
	pub fn grace_period(mut self, grace: Duration) -> Self {
		self.grace_period = grace;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ClientDescriptor, DescriptorError> {
		let descriptor = ClientDescriptor {
			base_url: self.base_url,
			endpoints: self.endpoints,
			nonce_header: self.nonce_header,
			login_route: self.login_route,
			grace_period: self.grace_period,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ClientDescriptor {
	/// Validates invariants for the descriptor.
	///
	/// Descriptors deserialized from configuration files bypass the builder and should be
	/// passed through this check before use.
	pub fn validate(&self) -> Result<(), DescriptorError> {
		validate_base_url(&self.base_url)?;

		for (endpoint, path) in self.endpoints.iter() {
			if !path.starts_with('/') {
				return Err(DescriptorError::RelativeEndpoint { endpoint, path: path.into() });
			}
		}

		if ::http::HeaderName::from_bytes(self.nonce_header.as_bytes()).is_err() {
			return Err(DescriptorError::InvalidNonceHeader { header: self.nonce_header.clone() });
		}
		if !self.login_route.starts_with('/') {
			return Err(DescriptorError::RelativeLoginRoute { route: self.login_route.clone() });
		}
		if self.grace_period.is_negative() {
			return Err(DescriptorError::NegativeGracePeriod);
		}

		Ok(())
	}
}

fn validate_base_url(url: &Url) -> Result<(), DescriptorError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(DescriptorError::UnsupportedScheme { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(DescriptorError::BaseUrlHasQuery { url: url.to_string() });
	}

	Ok(())
}
