//! Authenticated request pipeline - attach short-lived credentials, refresh them exactly once
//! no matter how many calls expire together, replay what failed, and fall back to a forced
//! re-login when the session cannot be recovered.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod model;
pub mod obs;
pub mod refresh;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ApiClient,
		config::ClientDescriptor,
		fallback::LoginRedirect,
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Login redirect that records every route it was asked to navigate to.
	#[derive(Debug, Default)]
	pub struct RecordingRedirect(Mutex<Vec<String>>);
	impl RecordingRedirect {
		/// Returns the routes observed so far, in call order.
		pub fn routes(&self) -> Vec<String> {
			self.0.lock().clone()
		}

		/// Returns how many redirects were issued.
		pub fn count(&self) -> usize {
			self.0.lock().len()
		}
	}
	impl LoginRedirect for RecordingRedirect {
		fn redirect_to_login(&self, route: &str) {
			self.0.lock().push(route.to_owned());
		}
	}

	/// Builds a reqwest transport with a cookie jar for mock servers.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Builds a descriptor pointed at `base_url` with the provided grace period.
	pub fn test_descriptor(base_url: &str, grace_period: Duration) -> ClientDescriptor {
		ClientDescriptor::builder(Url::parse(base_url).expect("Mock base URL should parse."))
			.grace_period(grace_period)
			.build()
			.expect("Test descriptor should build successfully.")
	}

	/// Polls `condition` for up to five seconds, returning whether it ever held.
	///
	/// The fallback runs on the refresh cycle's task after waiters are released, so its
	/// effects land shortly after a failed call returns.
	pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
		for _ in 0..500 {
			if condition() {
				return true;
			}

			tokio::time::sleep(std::time::Duration::from_millis(10)).await;
		}

		condition()
	}

	/// Constructs an [`ApiClient`] against `base_url` whose fallback redirects are recorded.
	pub fn build_reqwest_test_client(
		base_url: &str,
		grace_period: Duration,
	) -> (ReqwestTestClient, Arc<RecordingRedirect>) {
		let redirect = Arc::new(RecordingRedirect::default());
		let client = ApiClient::with_transport(
			test_descriptor(base_url, grace_period),
			test_reqwest_transport(),
		)
		.with_login_redirect(redirect.clone());

		(client, redirect)
	}
}

mod _prelude {
	pub use std::{
		collections::VecDeque,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
