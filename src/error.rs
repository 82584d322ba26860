//! Pipeline-level error types shared by the dispatcher, coordinator, and typed operations.

// self
use crate::{
	_prelude::*,
	auth::{CredentialError, IdentifierError},
	config::DescriptorError,
	refresh::RefreshError,
};

/// Pipeline-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical pipeline error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout); never retried by the pipeline.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Credential refresh failed; terminal for the current refresh cycle.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Identifier cannot be used as a request path segment.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
	/// Server issued a credential or nonce that cannot be sent back.
	#[error(transparent)]
	Credential(#[from] CredentialError),

	/// Server rejected a request that had already been replayed with a fresh credential.
	#[error("{method} {path} was rejected as unauthorized after a credential refresh.")]
	Unauthorized {
		/// HTTP method of the rejected request.
		method: String,
		/// Request path relative to the API base URL.
		path: String,
	},
	/// Nonce acquisition failed, so the mutating call was never dispatched.
	#[error("Nonce acquisition failed; the mutating call was not dispatched.")]
	Nonce {
		/// Failure raised while fetching the nonce.
		#[source]
		source: Box<Error>,
	},
	/// Server answered with a non-success status.
	#[error("Server responded with status {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Server-supplied message, or a preview of the response body.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body did not match the expected shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// Wraps a nonce acquisition failure.
	pub fn nonce(source: Error) -> Self {
		Self::Nonce { source: Box::new(source) }
	}

	/// Returns `true` when the error came from a rejected or failed credential refresh.
	pub fn is_refresh_failure(&self) -> bool {
		matches!(self, Self::Refresh(_))
	}
}

/// Configuration and request-construction failures raised by the pipeline.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Client descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Offending request path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {path}.")]
	Network {
		/// Request path that failed.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error raised for `path`.
	pub fn network(
		path: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { path: path.into(), source: Box::new(src) }
	}
}
