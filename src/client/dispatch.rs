// crates.io
use ::http::StatusCode;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	client::{ApiClient, common},
	error::TransportError,
	http::{ApiRequest, HttpResponse, Transport},
	obs::{self, OperationKind},
	store::Generation,
};

/// One dispatch of a request, paired with the credential it carries.
///
/// Attempts are values: a replay is a new attempt derived from the previous one, never a
/// mutation of the caller's request.
#[derive(Debug)]
struct Attempt<'a> {
	request: &'a ApiRequest,
	credential: Option<Credential>,
	generation: Generation,
	retried: bool,
}
impl<'a> Attempt<'a> {
	fn first(
		request: &'a ApiRequest,
		credential: Option<Credential>,
		generation: Generation,
	) -> Self {
		Self { request, credential, generation, retried: false }
	}

	fn replay(self, credential: Credential) -> Self {
		Self { credential: Some(credential), retried: true, ..self }
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Dispatches `request` with the current credential attached.
	///
	/// Any response other than `401 Unauthorized` is returned unchanged, including other
	/// error statuses. The first 401 joins (or starts) the shared refresh cycle and replays the
	/// request once with the refreshed credential. A 401 on the replay surfaces as
	/// [`Error::Unauthorized`]; a failed refresh surfaces as [`Error::Refresh`]. Transport
	/// failures are never retried.
	pub async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
		obs::observe(OperationKind::Dispatch, "execute", self.dispatch(request)).await
	}

	/// Dispatches `request` and decodes a successful JSON body into `R`.
	///
	/// Non-success statuses become [`Error::Status`].
	pub async fn execute_json<R>(&self, request: &ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		common::decode_success(self.execute(request).await?)
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse> {
		let snapshot = self.credentials.snapshot();
		let mut attempt = Attempt::first(request, snapshot.credential, snapshot.generation);

		loop {
			let response = self.send_attempt(&attempt).await?;

			if response.status() != StatusCode::UNAUTHORIZED {
				return Ok(response);
			}
			if attempt.retried {
				return Err(Error::Unauthorized {
					method: request.method.to_string(),
					path: request.path.clone(),
				});
			}

			let credential = self
				.coordinator
				.await_fresh_credential(attempt.generation, || {
					let client = self.clone();

					async move { client.refresh_credential().await }
				})
				.await?;

			obs::replaying(request.method.as_str(), &request.path);

			attempt = attempt.replay(credential);
		}
	}

	async fn send_attempt(&self, attempt: &Attempt<'_>) -> Result<HttpResponse> {
		self.send_once(attempt.request, attempt.credential.as_ref()).await
	}

	/// Sends `request` exactly once, without any refresh handling.
	pub(crate) async fn send_once(
		&self,
		request: &ApiRequest,
		credential: Option<&Credential>,
	) -> Result<HttpResponse> {
		let http_request = request.to_http(&self.descriptor, credential)?;

		self.transport
			.send(http_request)
			.await
			.map_err(|e| TransportError::network(request.path.as_str(), e).into())
	}
}
