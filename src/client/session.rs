// self
use crate::{
	_prelude::*,
	auth::{Credential, VerificationToken},
	client::{ApiClient, common},
	http::{ApiRequest, Transport},
	model::{LoginBody, Session, VerifyEmailResponse},
	obs::{self, OperationKind},
};

#[derive(Serialize)]
struct LoginRequest<'a> {
	email: &'a str,
	password: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Establishes a session with email and password.
	///
	/// Login bypasses the refresh pipeline: a rejection is returned as [`Error::Status`]
	/// and never starts a refresh cycle. The server's session cookie lands in the transport's
	/// cookie jar; an access token in the response body is installed in the credential store.
	pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
		obs::observe(OperationKind::Session, "login", async {
			let request = ApiRequest::post(&self.descriptor.endpoints.login)
				.json(&LoginRequest { email, password })?;
			let response = self.send_once(&request, None).await?;
			let body: LoginBody = common::decode_success(response)?;
			let credential = body.access_token.map(Credential::new).transpose()?;

			if let Some(credential) = &credential {
				self.credentials.replace(credential.clone());
			}

			Ok(Session { user: body.user, credential })
		})
		.await
	}

	/// Ends the session.
	///
	/// The credential store is cleared whether or not the server call succeeds; the server
	/// outcome is still reported to the caller.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(OperationKind::Session, "logout", async {
			let request = ApiRequest::post(&self.descriptor.endpoints.logout);
			let credential = self.credentials.current();
			let outcome = self
				.send_once(&request, credential.as_ref())
				.await
				.and_then(common::ensure_success);

			self.credentials.clear();

			outcome.map(|_| ())
		})
		.await
	}

	/// Consumes an email verification token.
	pub async fn verify_email(&self, token: &VerificationToken) -> Result<VerifyEmailResponse> {
		obs::observe(OperationKind::Session, "verify_email", async {
			let request = ApiRequest::get(self.descriptor.endpoints.verify_email_for(token));

			self.execute_json(&request).await
		})
		.await
	}
}
