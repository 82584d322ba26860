// std
use std::{
	io,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use http::{StatusCode, header::AUTHORIZATION};
use time::Duration;
use url::Url;
// self
use session_broker::{
	auth::{Credential, Symbol, WalletAddress},
	client::ApiClient,
	config::ClientDescriptor,
	error::Error,
	http::{ApiRequest, HttpRequest, HttpResponse, Transport, TransportFuture},
	refresh::RefreshState,
};

/// Scripted in-process server: `stale` is rejected, `fresh` is accepted, refresh is slow.
#[derive(Debug, Default)]
struct ScriptedTransport {
	refreshes: AtomicUsize,
	requests: AtomicUsize,
}
impl ScriptedTransport {
	fn respond(status: StatusCode, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = status;

		response
	}
}
impl Transport for ScriptedTransport {
	type Error = io::Error;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			self.requests.fetch_add(1, Ordering::SeqCst);

			let path = request.uri().path().to_owned();
			let bearer = request
				.headers()
				.get(AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			if path.starts_with("/pricehistory/current/") {
				return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
			}
			if path == "/auth/refresh" {
				assert!(bearer.is_none(), "Refresh must not carry an access credential.");

				self.refreshes.fetch_add(1, Ordering::SeqCst);
				tokio::time::sleep(std::time::Duration::from_millis(100)).await;

				return Ok(Self::respond(StatusCode::OK, "{\"accessToken\":\"fresh\"}"));
			}

			match bearer.as_deref() {
				Some("Bearer fresh") => Ok(Self::respond(
					StatusCode::OK,
					"{\"id\":\"w\",\"userId\":\"u\",\"symbol\":\"ETH\",\"address\":\"0xabc\",\
					 \"createdAt\":\"2024-05-01T10:00:00Z\",\"updatedAt\":\"2024-05-01T10:00:00Z\"}",
				)),
				_ => Ok(Self::respond(StatusCode::UNAUTHORIZED, "")),
			}
		})
	}
}

fn client(transport: Arc<ScriptedTransport>) -> ApiClient<ScriptedTransport> {
	let descriptor = ClientDescriptor::builder(
		Url::parse("http://api.invalid").expect("Base URL fixture should parse."),
	)
	.grace_period(Duration::milliseconds(10))
	.build()
	.expect("Descriptor should build.");

	ApiClient::with_transport(descriptor, transport)
		.with_credential(Credential::new("stale").expect("Credential fixture should build."))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn high_fan_out_triggers_a_single_refresh() {
	const CALLERS: usize = 64;

	let transport = Arc::new(ScriptedTransport::default());
	let client = client(transport.clone());
	let handles = (0..CALLERS)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move {
				let address = WalletAddress::new("0xabc").expect("Address should be valid.");

				client.get_wallet_by_address(&address).await
			})
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle
			.await
			.expect("Caller task should not panic.")
			.expect("Every caller should succeed with the refreshed credential.");
	}

	assert_eq!(transport.refreshes.load(Ordering::SeqCst), 1);
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.coordinator().state(), RefreshState::Idle);
	assert_eq!(client.coordinator().queued(), 0);
	assert_eq!(client.fallback().engagements(), 0);
}

#[tokio::test]
async fn transport_errors_surface_once_without_refresh() {
	let transport = Arc::new(ScriptedTransport::default());
	let client = client(transport.clone());
	let err = client
		.find_symbol_current_price(&Symbol::new("ETH").expect("Symbol should be valid."))
		.await
		.expect_err("A reset connection must surface to the caller.");

	assert!(matches!(err, Error::Transport(_)), "Unexpected error: {err:?}.");
	assert_eq!(transport.requests.load(Ordering::SeqCst), 1);
	assert_eq!(transport.refreshes.load(Ordering::SeqCst), 0);
	assert!(client.is_authenticated());
}

#[tokio::test]
async fn caller_headers_cannot_override_the_credential() {
	let transport = Arc::new(ScriptedTransport::default());
	let client = client(transport.clone());
	let request = ApiRequest::get("/wallet/0xabc")
		.header(AUTHORIZATION, http::HeaderValue::from_static("Bearer fresh"));
	let response = client.execute(&request).await.expect("Dispatch should succeed.");

	// The forged header is dropped, so the stale credential is rejected and refreshed first.
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(transport.refreshes.load(Ordering::SeqCst), 1);
	assert_eq!(transport.requests.load(Ordering::SeqCst), 3);
}
