// self
use crate::{
	_prelude::*,
	auth::{UserId, WalletAddress},
	client::ApiClient,
	http::{ApiRequest, Transport},
	model::Wallet,
	obs::{self, OperationKind},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateWallet<'a> {
	address: &'a str,
	user_id: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Loads a wallet and its balance history.
	pub async fn get_wallet_by_address(&self, address: &WalletAddress) -> Result<Wallet> {
		obs::observe(OperationKind::Wallet, "get_wallet_by_address", async {
			let request = ApiRequest::get(self.descriptor.endpoints.wallet_by_address(address));

			self.execute_json(&request).await
		})
		.await
	}

	/// Registers `address` for `user_id`.
	///
	/// Fetches a nonce first; when that fails the wallet endpoint is never called.
	pub async fn create_wallet(
		&self,
		address: &WalletAddress,
		user_id: &UserId,
	) -> Result<Wallet> {
		obs::observe(OperationKind::Wallet, "create_wallet", async {
			let request = ApiRequest::post(self.descriptor.endpoints.wallet_collection())
				.json(&CreateWallet { address, user_id })?;

			self.execute_json_with_nonce(request).await
		})
		.await
	}

	/// Asks the server to pull new transactions for `address`.
	///
	/// Nonce-protected like [`ApiClient::create_wallet`].
	pub async fn update_transactions(&self, address: &WalletAddress) -> Result<Wallet> {
		obs::observe(OperationKind::Wallet, "update_transactions", async {
			let request = ApiRequest::post(self.descriptor.endpoints.wallet_by_address(address))
				.json(&serde_json::json!({}))?;

			self.execute_json_with_nonce(request).await
		})
		.await
	}
}
