//! Single-use nonce attached to state-changing calls.

// crates.io
use ::http::HeaderValue;
// self
use crate::{_prelude::*, auth::CredentialError};

/// Single-use token scoped to exactly one mutating call.
///
/// `Nonce` is not `Clone`; [`Nonce::into_header_value`] consumes it, so a value
/// fetched for one call cannot be attached to another.
#[derive(PartialEq, Eq)]
pub struct Nonce {
	value: String,
	header: HeaderValue,
}
impl Nonce {
	/// Wraps a nonce issued by the server.
	pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
		let value = value.into();

		if value.is_empty() {
			return Err(CredentialError::Empty { kind: "Nonce" });
		}

		let mut header = HeaderValue::from_str(&value)
			.map_err(|_| CredentialError::InvalidHeaderValue { kind: "Nonce" })?;

		header.set_sensitive(true);

		Ok(Self { value, header })
	}

	/// Returns the raw nonce value.
	pub fn expose(&self) -> &str {
		&self.value
	}

	/// Consumes the nonce, producing the header value to send with the mutating call.
	pub fn into_header_value(self) -> HeaderValue {
		self.header
	}
}
impl Debug for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Nonce").field(&"<redacted>").finish()
	}
}
