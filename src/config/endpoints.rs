// self
use crate::{
	_prelude::*,
	auth::{Symbol, VerificationToken, WalletAddress},
};

/// Endpoint paths, relative to [`ClientDescriptor::base_url`](crate::config::ClientDescriptor).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
	/// Exchanges the ambient session cookie for a new access credential.
	pub refresh: String,
	/// Issues single-use nonces.
	pub nonce: String,
	/// Establishes the ambient session.
	pub login: String,
	/// Clears the ambient session.
	pub logout: String,
	/// Prefix for email verification links.
	pub verify_email: String,
	/// Wallet collection prefix.
	pub wallet: String,
	/// Price history prefix.
	pub price_history: String,
	/// Current price prefix.
	pub current_price: String,
}
impl ApiEndpoints {
	/// Path used to create wallets (`POST`).
	pub fn wallet_collection(&self) -> String {
		format!("{}/", self.wallet.trim_end_matches('/'))
	}

	/// Path addressing a single wallet.
	pub fn wallet_by_address(&self, address: &WalletAddress) -> String {
		join_segment(&self.wallet, address)
	}

	/// Path listing a symbol's price history.
	pub fn price_history_for(&self, symbol: &Symbol) -> String {
		join_segment(&self.price_history, symbol)
	}

	/// Path returning a symbol's current price.
	pub fn current_price_for(&self, symbol: &Symbol) -> String {
		join_segment(&self.current_price, symbol)
	}

	/// Path consuming an email verification token.
	pub fn verify_email_for(&self, token: &VerificationToken) -> String {
		join_segment(&self.verify_email, token)
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		[
			("refresh", self.refresh.as_str()),
			("nonce", self.nonce.as_str()),
			("login", self.login.as_str()),
			("logout", self.logout.as_str()),
			("verify_email", self.verify_email.as_str()),
			("wallet", self.wallet.as_str()),
			("price_history", self.price_history.as_str()),
			("current_price", self.current_price.as_str()),
		]
		.into_iter()
	}
}
impl Default for ApiEndpoints {
	fn default() -> Self {
		Self {
			refresh: "/auth/refresh".into(),
			nonce: "/nonce/".into(),
			login: "/auth/login".into(),
			logout: "/auth/logout".into(),
			verify_email: "/auth/verify-email".into(),
			wallet: "/wallet".into(),
			price_history: "/pricehistory".into(),
			current_price: "/pricehistory/current".into(),
		}
	}
}

fn join_segment(prefix: &str, segment: &str) -> String {
	format!("{}/{segment}", prefix.trim_end_matches('/'))
}
