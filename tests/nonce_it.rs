#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use session_broker::{
	_preludet::*,
	auth::{Credential, UserId, WalletAddress},
};

fn wallet_body() -> Value {
	json!({
		"id": "wallet-1",
		"userId": "user1",
		"symbol": "ETH",
		"address": "0xabc",
		"createdAt": "2024-05-01T10:00:00Z",
		"updatedAt": "2024-05-01T10:00:00Z"
	})
}

fn client(server: &MockServer) -> ReqwestTestClient {
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));

	client.with_credential(Credential::new("live").expect("Credential fixture should build."))
}

fn ids() -> (WalletAddress, UserId) {
	(
		WalletAddress::new("0xabc").expect("Wallet address fixture should be valid."),
		UserId::new("user1").expect("User identifier fixture should be valid."),
	)
}

#[tokio::test]
async fn create_wallet_sends_a_fresh_nonce() {
	let server = MockServer::start_async().await;
	let nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/").header("authorization", "Bearer live");
			then.status(200).json_body(json!({ "nonce": "n-1" }));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wallet/")
				.header("authorization", "Bearer live")
				.header("x-nonce", "n-1")
				.json_body(json!({ "address": "0xabc", "userId": "user1" }));
			then.status(201).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, user) = ids();
	let wallet =
		client.create_wallet(&address, &user).await.expect("Wallet creation should succeed.");

	assert_eq!(wallet.id, "wallet-1");
	assert!(wallet.transactions.is_empty());

	nonce.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
}

#[tokio::test]
async fn nonce_failure_aborts_the_mutation() {
	let server = MockServer::start_async().await;
	let nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/");
			then.status(503).json_body(json!({ "message": "nonce service unavailable" }));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/wallet/");
			then.status(201).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, user) = ids();
	let err = client
		.create_wallet(&address, &user)
		.await
		.expect_err("Wallet creation must fail without a nonce.");

	match &err {
		Error::Nonce { source } => assert!(
			matches!(source.as_ref(), Error::Status { status: 503, .. }),
			"Unexpected nonce cause: {source:?}."
		),
		other => panic!("Expected a nonce failure, got {other:?}."),
	}

	nonce.assert_calls_async(1).await;
	create.assert_calls_async(0).await;
}

#[tokio::test]
async fn malformed_nonce_body_aborts_update_transactions() {
	let server = MockServer::start_async().await;
	let _nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/");
			then.status(200).json_body(json!({ "value": "n-1" }));
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(POST).path("/wallet/0xabc");
			then.status(200).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, _) = ids();
	let err = client
		.update_transactions(&address)
		.await
		.expect_err("A nonce body without a nonce must abort the update.");

	assert!(matches!(err, Error::Nonce { .. }), "Unexpected error: {err:?}.");

	update.assert_calls_async(0).await;
}

#[tokio::test]
async fn concurrent_mutations_fetch_their_own_nonces() {
	let server = MockServer::start_async().await;
	let nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/");
			then.status(200).json_body(json!({ "nonce": "n-shared-endpoint" }));
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wallet/0xabc")
				.header("x-nonce", "n-shared-endpoint")
				.json_body(json!({}));
			then.status(200).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, _) = ids();
	let (first, second) =
		tokio::join!(client.update_transactions(&address), client.update_transactions(&address));

	first.expect("First update should succeed.");
	second.expect("Second update should succeed.");

	nonce.assert_calls_async(2).await;
	update.assert_calls_async(2).await;
}

#[tokio::test]
async fn nonce_fetch_recovers_an_expired_credential() {
	let server = MockServer::start_async().await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/").header("authorization", "Bearer live");
			then.status(401);
		})
		.await;
	let _nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/").header("authorization", "Bearer renewed");
			then.status(200).json_body(json!({ "nonce": "n-2" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).json_body(json!({ "accessToken": "renewed" }));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wallet/")
				.header("authorization", "Bearer renewed")
				.header("x-nonce", "n-2");
			then.status(201).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, user) = ids();

	client.create_wallet(&address, &user).await.expect("Wallet creation should succeed.");

	refresh.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_mutation_is_replayed_with_the_same_nonce() {
	let server = MockServer::start_async().await;
	let nonce = server
		.mock_async(|when, then| {
			when.method(GET).path("/nonce/");
			then.status(200).json_body(json!({ "nonce": "n-1" }));
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/wallet/").header("authorization", "Bearer live");
			then.status(401).json_body(json!({ "message": "jwt expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").header_missing("authorization");
			then.status(200).json_body(json!({ "accessToken": "fresh" }));
		})
		.await;
	let replayed = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wallet/")
				.header("authorization", "Bearer fresh")
				.header("x-nonce", "n-1")
				.json_body(json!({ "address": "0xabc", "userId": "user1" }));
			then.status(201).json_body(wallet_body());
		})
		.await;
	let client = client(&server);
	let (address, user) = ids();
	let wallet = client
		.create_wallet(&address, &user)
		.await
		.expect("The replayed mutation should succeed.");

	assert_eq!(wallet.id, "wallet-1");

	nonce.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	replayed.assert_calls_async(1).await;
}
