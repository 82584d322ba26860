//! Bearer credential wrapper that redacts the secret and carries its derived header.

// crates.io
use ::http::HeaderValue;
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Errors raised while constructing a [`Credential`] or [`Nonce`](crate::auth::Nonce).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The server handed out an empty value.
	#[error("{kind} value cannot be empty.")]
	Empty {
		/// Kind of value (credential or nonce).
		kind: &'static str,
	},
	/// The value cannot travel inside an HTTP header.
	#[error("{kind} value is not a valid HTTP header value.")]
	InvalidHeaderValue {
		/// Kind of value (credential or nonce).
		kind: &'static str,
	},
}

/// Short-lived access credential attached to outgoing requests as `Authorization: Bearer`.
///
/// The derived header value is computed once at construction and flagged as sensitive so
/// HTTP stacks that honor the flag keep it out of their own debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: String,
	header: HeaderValue,
}
impl Credential {
	/// Wraps a new access token after checking it can be sent as a bearer header.
	pub fn new(token: impl Into<String>) -> Result<Self, CredentialError> {
		const KIND: &str = "Credential";

		let token = token.into();

		if token.is_empty() {
			return Err(CredentialError::Empty { kind: KIND });
		}

		let mut header = HeaderValue::from_str(&format!("Bearer {token}"))
			.map_err(|_| CredentialError::InvalidHeaderValue { kind: KIND })?;

		header.set_sensitive(true);

		Ok(Self { token, header })
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.token
	}

	/// Returns the `Authorization` header value derived from the token.
	pub fn authorization_header(&self) -> &HeaderValue {
		&self.header
	}

	/// Stable, non-reversible identifier safe to emit in logs.
	///
	/// Base64 (no padding) of the first 12 bytes of the token's SHA-256 digest.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.token.as_bytes());

		STANDARD_NO_PAD.encode(&digest[..12])
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
