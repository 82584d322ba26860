// self
use crate::{
	_prelude::*,
	auth::Nonce,
	client::{ApiClient, common},
	http::{ApiRequest, HttpResponse, Transport},
	model::NonceBody,
	obs::{self, OperationKind},
};

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Fetches a single-use nonce for the next mutating call.
	///
	/// The request goes through [`ApiClient::execute`], so an expired credential is
	/// refreshed exactly like any other call.
	pub async fn fetch_nonce(&self) -> Result<Nonce> {
		obs::observe(OperationKind::Nonce, "fetch_nonce", async {
			let request = ApiRequest::get(&self.descriptor.endpoints.nonce);
			let body: NonceBody = self.execute_json(&request).await?;

			Ok(Nonce::new(body.nonce)?)
		})
		.await
	}

	/// Fetches a nonce, attaches it to `request`, and dispatches the result.
	///
	/// Fails with [`Error::Nonce`] without dispatching `request` when the nonce cannot be
	/// obtained.
	pub(crate) async fn execute_with_nonce(&self, request: ApiRequest) -> Result<HttpResponse> {
		let header = self.descriptor.nonce_header_name()?;
		let nonce = self.fetch_nonce().await.map_err(Error::nonce)?;
		let request = request.header(header, nonce.into_header_value());

		self.execute(&request).await
	}

	pub(crate) async fn execute_json_with_nonce<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: serde::de::DeserializeOwned,
	{
		common::decode_success(self.execute_with_nonce(request).await?)
	}
}
