//! Response helpers shared by the typed operations.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	http::{self, HttpResponse},
	model::MessageBody,
};

const MESSAGE_PREVIEW_LEN: usize = 256;

/// Passes success responses through and converts every other status into [`Error::Status`].
pub(crate) fn ensure_success(response: HttpResponse) -> Result<HttpResponse> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	Err(Error::Status {
		status: status.as_u16(),
		message: error_message(response.body(), status.canonical_reason()),
		retry_after: http::parse_retry_after(response.headers()),
	})
}

/// Decodes a JSON body, keeping the path of the field that failed.
pub(crate) fn decode_json<R>(response: &HttpResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: response.status().as_u16() })
}

pub(crate) fn decode_success<R>(response: HttpResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	decode_json(&ensure_success(response)?)
}

fn error_message(body: &[u8], reason: Option<&str>) -> String {
	if let Ok(MessageBody { message }) = serde_json::from_slice(body) {
		return message;
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() {
		return reason.unwrap_or("no response body").to_owned();
	}

	text.chars().take(MESSAGE_PREVIEW_LEN).collect()
}
