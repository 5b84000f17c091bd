//! Email credentials: email + password, or email + out-of-band link code.

// self
use crate::{
	_prelude::*,
	api::{
		self, SignInWithEmailLinkRequest, SignInWithPasswordRequest, TransportErrorMapper,
		UpdateAccountRequest,
	},
	auth::{AuthContext, TenantId},
	credential::{
		self, CredentialExchange, CredentialOperation, ExchangeFuture, ProviderId, SignInMethod,
	},
	http::BackendHttpClient,
	obs,
	token::{TokenResponse, TokenSecret},
};

/// Credential proving control of an email address.
///
/// The secret is either the account password ([`SignInMethod::EmailPassword`]) or the
/// `oobCode` carried by a sign-in link ([`SignInMethod::EmailLink`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailAuthCredential {
	email: String,
	secret: TokenSecret,
	sign_in_method: SignInMethod,
	tenant_id: Option<TenantId>,
}
impl EmailAuthCredential {
	/// Creates an email + password credential.
	pub fn with_password(email: impl Into<String>, password: impl Into<TokenSecret>) -> Result<Self> {
		Self::new(email.into(), password.into(), SignInMethod::EmailPassword)
	}

	/// Creates an email-link credential from the link's out-of-band code.
	pub fn with_email_link(email: impl Into<String>, oob_code: impl Into<TokenSecret>) -> Result<Self> {
		Self::new(email.into(), oob_code.into(), SignInMethod::EmailLink)
	}

	/// Records the tenant the credential was issued for.
	pub fn with_tenant_id(mut self, tenant_id: TenantId) -> Self {
		self.tenant_id = Some(tenant_id);

		self
	}

	/// Email the credential proves control of.
	pub fn email(&self) -> &str {
		&self.email
	}

	/// Tenant the credential was issued for, if any.
	pub fn tenant_id(&self) -> Option<&TenantId> {
		self.tenant_id.as_ref()
	}

	pub(crate) fn from_json(value: serde_json::Value) -> Result<Self> {
		let payload = credential::decode_json::<EmailCredentialJson>(value)?;

		if !matches!(payload.sign_in_method, SignInMethod::EmailPassword | SignInMethod::EmailLink) {
			return Err(Error::invalid_credential(format!(
				"sign-in method `{}` is not an email method",
				payload.sign_in_method
			)));
		}
		if payload.provider_id.is_some_and(|provider| provider != ProviderId::Password) {
			return Err(Error::invalid_credential("email credentials use the `password` provider"));
		}

		let credential = Self::new(payload.email, payload.password, payload.sign_in_method)?;

		Ok(match payload.tenant_id {
			Some(tenant_id) => credential.with_tenant_id(tenant_id),
			None => credential,
		})
	}

	fn new(email: String, secret: TokenSecret, sign_in_method: SignInMethod) -> Result<Self> {
		credential::require_non_empty("email", &email)?;
		credential::require_non_empty(
			if sign_in_method == SignInMethod::EmailLink { "oobCode" } else { "password" },
			secret.expose(),
		)?;

		Ok(Self { email, secret, sign_in_method, tenant_id: None })
	}

	async fn sign_in<C, M>(&self, auth: &AuthContext<C, M>) -> Result<TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		match self.sign_in_method {
			SignInMethod::EmailLink =>
				api::sign_in_with_email_link(auth, self.email_link_request(None)).await,
			_ =>
				api::sign_in_with_password(
					auth,
					SignInWithPasswordRequest {
						email: self.email.clone(),
						password: self.secret.clone(),
						return_secure_token: true,
					},
				)
				.await,
		}
	}

	async fn link<C, M>(&self, auth: &AuthContext<C, M>, id_token: &str) -> Result<TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let id_token = TokenSecret::new(id_token);

		match self.sign_in_method {
			SignInMethod::EmailLink =>
				api::sign_in_with_email_link(auth, self.email_link_request(Some(id_token))).await,
			_ =>
				api::update_account(
					auth,
					UpdateAccountRequest {
						id_token,
						email: Some(self.email.clone()),
						password: Some(self.secret.clone()),
						return_secure_token: true,
					},
				)
				.await,
		}
	}

	fn email_link_request(&self, id_token: Option<TokenSecret>) -> SignInWithEmailLinkRequest {
		SignInWithEmailLinkRequest {
			email: self.email.clone(),
			oob_code: self.secret.clone(),
			id_token,
		}
	}
}
impl CredentialExchange for EmailAuthCredential {
	fn provider_id(&self) -> ProviderId {
		ProviderId::Password
	}

	fn sign_in_method(&self) -> SignInMethod {
		self.sign_in_method
	}

	fn get_id_token_response<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		obs::instrument_exchange(
			ProviderId::Password,
			CredentialOperation::GetIdTokenResponse,
			self.sign_in(auth),
		)
	}

	fn link_to_id_token<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		id_token: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		obs::instrument_exchange(
			ProviderId::Password,
			CredentialOperation::LinkToIdToken,
			self.link(auth, id_token),
		)
	}

	fn match_id_token_with_uid<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		uid: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		obs::instrument_exchange(
			ProviderId::Password,
			CredentialOperation::MatchIdTokenWithUid,
			credential::verify_uid(self.sign_in(auth), uid),
		)
	}

	fn to_json(&self) -> Result<serde_json::Value> {
		credential::encode_json(&EmailCredentialJson {
			provider_id: Some(ProviderId::Password),
			sign_in_method: self.sign_in_method,
			email: self.email.clone(),
			password: self.secret.clone(),
			tenant_id: self.tenant_id.clone(),
		})
	}
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailCredentialJson {
	#[serde(default)]
	provider_id: Option<ProviderId>,
	sign_in_method: SignInMethod,
	email: String,
	password: TokenSecret,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	tenant_id: Option<TenantId>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn constructors_validate_inputs() {
		let credential = EmailAuthCredential::with_password("ada@example.com", "hunter2")
			.expect("Password credential should build.");

		assert_eq!(credential.provider_id(), ProviderId::Password);
		assert_eq!(credential.sign_in_method(), SignInMethod::EmailPassword);
		assert_eq!(credential.email(), "ada@example.com");
		assert!(credential.supports(CredentialOperation::ToJson));

		let link = EmailAuthCredential::with_email_link("ada@example.com", "oob-code")
			.expect("Link credential should build.");

		assert_eq!(link.sign_in_method(), SignInMethod::EmailLink);
		assert!(matches!(
			EmailAuthCredential::with_password("", "hunter2"),
			Err(Error::InvalidCredential { .. })
		));
		assert!(matches!(
			EmailAuthCredential::with_email_link("ada@example.com", " "),
			Err(Error::InvalidCredential { ref reason }) if reason.contains("oobCode")
		));
	}

	#[test]
	fn json_layout_is_camel_case_and_reversible() {
		let credential = EmailAuthCredential::with_email_link("ada@example.com", "oob-code")
			.expect("Link credential should build.")
			.with_tenant_id(TenantId::new("tenant-1").expect("Tenant fixture should be valid."));
		let value = credential.to_json().expect("Email credential should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"providerId": "password",
				"signInMethod": "emailLink",
				"email": "ada@example.com",
				"password": "oob-code",
				"tenantId": "tenant-1",
			})
		);
		assert_eq!(
			EmailAuthCredential::from_json(value).expect("Email JSON should parse."),
			credential
		);
	}

	#[test]
	fn json_with_a_foreign_method_is_rejected() {
		let err = EmailAuthCredential::from_json(serde_json::json!({
			"signInMethod": "phone",
			"email": "ada@example.com",
			"password": "hunter2",
		}))
		.expect_err("Phone method must not build an email credential.");

		assert!(matches!(err, Error::InvalidCredential { .. }));
	}
}
