// crates.io
use ::http::{HeaderValue, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	client::ApiClient,
	http::{ApiRequest, Transport},
	model::AccessTokenBody,
	obs::{self, OperationKind},
	refresh::RefreshError,
};

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Exchanges the ambient session evidence for a new access credential.
	///
	/// Posts an empty JSON object to the refresh endpoint without an `Authorization` header;
	/// the transport supplies the session cookie. The call is made once with no retry and
	/// does not touch the credential store. Callers normally reach this only through the
	/// refresh coordinator.
	pub async fn refresh_credential(&self) -> Result<Credential, RefreshError> {
		obs::observe(OperationKind::Refresh, "refresh_credential", self.request_refresh()).await
	}

	async fn request_refresh(&self) -> Result<Credential, RefreshError> {
		let request = ApiRequest {
			body: Some(b"{}".to_vec()),
			..ApiRequest::post(&self.descriptor.endpoints.refresh)
		}
		.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		let http_request = request
			.to_http(&self.descriptor, None)
			.map_err(|e| RefreshError::Transport { reason: e.to_string() })?;
		let response = self
			.transport
			.send(http_request)
			.await
			.map_err(|e| RefreshError::Transport { reason: e.to_string() })?;
		let status = response.status();

		if !status.is_success() {
			return Err(RefreshError::Rejected { status: status.as_u16() });
		}

		let body: AccessTokenBody = serde_json::from_slice(response.body())
			.map_err(|e| RefreshError::Malformed { reason: e.to_string() })?;

		Credential::new(body.access_token)
			.map_err(|e| RefreshError::Malformed { reason: e.to_string() })
	}
}
