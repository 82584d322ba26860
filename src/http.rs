//! Transport primitives and the immutable request descriptor.
//!
//! The module exposes [`Transport`], the pipeline's only dependency on an HTTP stack, and
//! [`ApiRequest`], the value every caller hands to the dispatcher. A request descriptor never
//! changes after construction; the dispatcher renders a fresh [`HttpRequest`] for each attempt
//! with whatever credential that attempt carries.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method, Request, Response,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::Credential, config::ClientDescriptor, error::ConfigError};

/// Request shape handed to a [`Transport`].
pub type HttpRequest = Request<Vec<u8>>;
/// Response shape produced by a [`Transport`].
pub type HttpResponse = Response<Vec<u8>>;
/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing pipeline requests.
///
/// Implementations own connection management and the ambient session evidence (for the
/// default reqwest transport, a cookie jar that carries the refresh cookie). They must not
/// retry, follow authentication challenges, or inspect status codes; the dispatcher owns
/// every such decision. Implementations must be `Send + Sync + 'static` so one instance can be
/// shared by every in-flight request.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type Error: 'static + Send + Sync + StdError;

	/// Executes `request`, resolving with any HTTP response or a transport-level failure.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error>;
}

/// Immutable description of one API call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the descriptor's base URL.
	pub path: String,
	/// Extra headers; `Authorization` is always supplied by the dispatcher.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), headers: HeaderMap::new(), body: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Attaches a JSON body and the matching content type.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body)?);
		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Ok(self)
	}

	/// Adds or replaces a header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Renders the transport request for one attempt.
	///
	/// Any caller-supplied `Authorization` header is discarded; the attempt's credential,
	/// when present, is the only authorization that leaves the pipeline.
	pub fn to_http(
		&self,
		descriptor: &ClientDescriptor,
		credential: Option<&Credential>,
	) -> Result<HttpRequest, ConfigError> {
		let url = descriptor.url_for(&self.path)?;
		let mut request = Request::builder()
			.method(self.method.clone())
			.uri(url.as_str())
			.body(self.body.clone().unwrap_or_default())?;
		let headers = request.headers_mut();

		headers.extend(self.headers.clone());
		headers.remove(AUTHORIZATION);

		if !headers.contains_key(ACCEPT) {
			headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
		}
		if let Some(credential) = credential {
			headers.insert(AUTHORIZATION, credential.authorization_header().clone());
		}

		Ok(request)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The refresh endpoint authenticates with an HTTP-only session cookie, so the client must
/// keep a cookie jar; [`ReqwestTransport::new`] enables one. Any custom client passed to
/// [`ReqwestTransport::with_client`] needs `cookie_store(true)` for refresh to work.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a cookie jar enabled.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().cookie_store(true).build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	type Error = ReqwestError;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Extracts the Retry-After hint from a response, as a relative duration.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
