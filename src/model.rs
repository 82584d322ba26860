//! Response bodies returned by the typed API operations.
//!
//! Every model deserializes camelCase field names and RFC 3339 timestamps. The pipeline
//! never validates domain content; these types only give callers a typed view.

// self
use crate::{_prelude::*, auth::Credential};

/// Authenticated account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Server-assigned user identifier.
	pub id: String,
	/// Login email.
	pub email: String,
	/// Wallets owned by the user.
	#[serde(default)]
	pub wallets: Vec<Wallet>,
}

/// Tracked wallet with its balance history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
	/// Server-assigned wallet identifier.
	pub id: String,
	/// Owning user identifier.
	pub user_id: String,
	/// Asset symbol tracked by the wallet.
	pub symbol: String,
	/// On-chain address.
	pub address: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Balance snapshots; omitted by endpoints that do not embed them.
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

/// Balance snapshot recorded for one on-chain transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Server-assigned transaction identifier.
	pub id: String,
	/// Owning user identifier.
	pub user_id: String,
	/// Wallet the transaction belongs to.
	pub wallet_id: String,
	/// Block that included the transaction.
	pub block_number: u64,
	/// Position of the transaction inside its block.
	pub transaction_index: u32,
	/// Wallet balance after the transaction.
	pub balance: f64,
	/// Block timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub date: OffsetDateTime,
}

/// One sample of a symbol's price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
	/// Quoted price.
	pub price: f64,
	/// Sample time; the current-price endpoint may omit it.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub date: Option<OffsetDateTime>,
	/// Symbol the price belongs to, when echoed by the server.
	#[serde(default)]
	pub symbol: Option<String>,
}

/// Result of consuming an email verification token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
	/// Human-readable confirmation.
	pub message: String,
}

/// Login result.
#[derive(Clone, Debug)]
pub struct Session {
	/// Authenticated user.
	pub user: User,
	/// Credential installed in the store, when the server issued one with the login.
	pub credential: Option<Credential>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginBody {
	pub(crate) user: User,
	#[serde(default)]
	pub(crate) access_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessTokenBody {
	pub(crate) access_token: String,
}

#[derive(Deserialize)]
pub(crate) struct NonceBody {
	pub(crate) nonce: String,
}

#[derive(Deserialize)]
pub(crate) struct MessageBody {
	pub(crate) message: String,
}
