#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use session_broker::{
	_preludet::*,
	auth::{Credential, Symbol, VerificationToken, WalletAddress},
};

fn user_body() -> serde_json::Value {
	json!({
		"id": "user1",
		"email": "ada@example.com",
		"wallets": [{
			"id": "wallet-1",
			"userId": "user1",
			"symbol": "ETH",
			"address": "0xabc",
			"createdAt": "2024-05-01T10:00:00Z",
			"updatedAt": "2024-05-01T10:00:00Z"
		}]
	})
}

#[tokio::test]
async fn login_installs_credential_and_session_cookie_drives_refresh() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.header_missing("authorization")
				.json_body(json!({ "email": "ada@example.com", "password": "hunter2" }));
			then.status(200)
				.header("set-cookie", "refreshToken=r-1; Path=/; HttpOnly")
				.json_body(json!({ "user": user_body(), "accessToken": "stale" }));
		})
		.await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/pricehistory/ETH").header("authorization", "Bearer stale");
			then.status(401);
		})
		.await;
	let history = server
		.mock_async(|when, then| {
			when.method(GET).path("/pricehistory/ETH").header("authorization", "Bearer fresh");
			then.status(200).json_body(json!([
				{ "price": 3000.5, "date": "2024-05-01T00:00:00Z" },
				{ "price": 3050.0, "date": "2024-05-02T00:00:00Z" }
			]));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.header("cookie", "refreshToken=r-1")
				.json_body(json!({}));
			then.status(200).json_body(json!({ "accessToken": "fresh" }));
		})
		.await;
	let (client, redirect) =
		build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let session =
		client.login("ada@example.com", "hunter2").await.expect("Login should succeed.");

	assert_eq!(session.user.id, "user1");
	assert_eq!(session.user.wallets[0].address, "0xabc");
	assert_eq!(session.credential.as_ref().map(Credential::expose), Some("stale"));
	assert!(client.is_authenticated());

	let points = client
		.find_symbol_price_history(&Symbol::new("ETH").expect("Symbol fixture should be valid."))
		.await
		.expect("Price history should load after a transparent refresh.");

	assert_eq!(points.len(), 2);
	assert_eq!(points[1].price, 3050.0);

	login.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	history.assert_calls_async(1).await;

	assert_eq!(redirect.count(), 0);
}

#[tokio::test]
async fn rejected_login_never_starts_a_refresh() {
	let server = MockServer::start_async().await;
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(401).json_body(json!({ "message": "Invalid credentials" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).json_body(json!({ "accessToken": "unused" }));
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let err = client
		.login("ada@example.com", "wrong")
		.await
		.expect_err("Bad credentials must be rejected.");

	assert!(
		matches!(err, Error::Status { status: 401, ref message, .. } if message == "Invalid credentials"),
		"Unexpected error: {err:?}."
	);
	assert!(!client.is_authenticated());

	refresh.assert_calls_async(0).await;
}

#[tokio::test]
async fn logout_clears_the_store_even_when_the_server_fails() {
	let server = MockServer::start_async().await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer live");
			then.status(500);
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let client = client.with_credential(Credential::new("live").expect("Credential should build."));
	let err = client.logout().await.expect_err("The server failure is still reported.");

	assert!(matches!(err, Error::Status { status: 500, .. }), "Unexpected error: {err:?}.");
	assert!(!client.is_authenticated());

	logout.assert_calls_async(1).await;
}

#[tokio::test]
async fn logout_succeeds_and_later_calls_go_out_anonymously() {
	let server = MockServer::start_async().await;
	let _logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout");
			then.status(204);
		})
		.await;
	let anonymous = server
		.mock_async(|when, then| {
			when.method(GET).path("/pricehistory/current/BTC").header_missing("authorization");
			then.status(200).json_body(json!({ "price": 64000.25, "symbol": "BTC" }));
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let client = client.with_credential(Credential::new("live").expect("Credential should build."));

	client.logout().await.expect("Logout should succeed.");

	let point = client
		.find_symbol_current_price(&Symbol::new("BTC").expect("Symbol fixture should be valid."))
		.await
		.expect("Current price should load.");

	assert_eq!(point.price, 64000.25);
	assert_eq!(point.symbol.as_deref(), Some("BTC"));
	assert!(point.date.is_none());

	anonymous.assert_calls_async(1).await;
}

#[tokio::test]
async fn verify_email_consumes_the_token() {
	let server = MockServer::start_async().await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/verify-email/tok-123");
			then.status(200).json_body(json!({ "message": "Email verified" }));
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let token = VerificationToken::new("tok-123").expect("Token fixture should be valid.");
	let response = client.verify_email(&token).await.expect("Verification should succeed.");

	assert_eq!(response.message, "Email verified");

	verify.assert_calls_async(1).await;
}

#[tokio::test]
async fn wallet_decode_errors_keep_the_failing_path() {
	let server = MockServer::start_async().await;
	let _wallet = server
		.mock_async(|when, then| {
			when.method(GET).path("/wallet/0xabc");
			then.status(200).json_body(json!({ "id": "wallet-1", "userId": 7 }));
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), Duration::milliseconds(50));
	let err = client
		.get_wallet_by_address(&WalletAddress::new("0xabc").expect("Address should be valid."))
		.await
		.expect_err("A malformed wallet must not decode.");

	match err {
		Error::Decode { source, status } => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "userId");
		},
		other => panic!("Expected a decode error, got {other:?}."),
	}
}
