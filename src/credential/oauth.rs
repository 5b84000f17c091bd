//! Federated credentials exchanged through `accounts:signInWithIdp`.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	api::{self, SignInWithIdpRequest, TransportErrorMapper},
	auth::AuthContext,
	credential::{
		self, CredentialExchange, CredentialOperation, ExchangeFuture, ProviderId, SignInMethod,
	},
	http::BackendHttpClient,
	obs,
	token::{TokenResponse, TokenSecret},
};

/// Continue URI sent with every federated exchange; the backend only echoes it.
const IDP_REQUEST_URI: &str = "http://localhost";

/// Raw provider assertion used to build an [`OAuthCredential`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCredentialParams {
	/// OpenID Connect id token issued by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
	/// OAuth access token issued by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<TokenSecret>,
	/// OAuth 1.0 token secret; requires `access_token`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secret: Option<TokenSecret>,
	/// Raw nonce the id token was minted for.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nonce: Option<String>,
	/// Pending token returned by an earlier, unfinished exchange.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pending_token: Option<TokenSecret>,
}

/// Credential carrying a federated provider's assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthCredential {
	provider_id: ProviderId,
	sign_in_method: SignInMethod,
	params: OAuthCredentialParams,
}
impl OAuthCredential {
	/// Validates the assertion and binds it to a federated provider.
	///
	/// Empty tokens are treated as absent.
	pub fn new(provider_id: ProviderId, mut params: OAuthCredentialParams) -> Result<Self> {
		let sign_in_method = SignInMethod::federated(provider_id).ok_or_else(|| {
			Error::invalid_credential(format!("provider `{provider_id}` is not a federated provider"))
		})?;

		for token in [
			&mut params.id_token,
			&mut params.access_token,
			&mut params.secret,
			&mut params.pending_token,
		] {
			if token.as_ref().is_some_and(TokenSecret::is_empty) {
				*token = None;
			}
		}
		if params.nonce.as_deref().is_some_and(str::is_empty) {
			params.nonce = None;
		}
		if params.id_token.is_none() && params.access_token.is_none() && params.pending_token.is_none()
		{
			return Err(Error::invalid_credential(
				"an id token, access token, or pending token is required",
			));
		}
		if params.secret.is_some() && params.access_token.is_none() {
			return Err(Error::invalid_credential("a token secret requires an access token"));
		}

		Ok(Self { provider_id, sign_in_method, params })
	}

	/// Google credential from an id token and/or access token.
	pub fn google(
		id_token: Option<TokenSecret>,
		access_token: Option<TokenSecret>,
	) -> Result<Self> {
		Self::new(ProviderId::Google, OAuthCredentialParams {
			id_token,
			access_token,
			..Default::default()
		})
	}

	/// Facebook credential from an access token.
	pub fn facebook(access_token: impl Into<TokenSecret>) -> Result<Self> {
		Self::new(ProviderId::Facebook, OAuthCredentialParams {
			access_token: Some(access_token.into()),
			..Default::default()
		})
	}

	/// GitHub credential from an access token.
	pub fn github(access_token: impl Into<TokenSecret>) -> Result<Self> {
		Self::new(ProviderId::GitHub, OAuthCredentialParams {
			access_token: Some(access_token.into()),
			..Default::default()
		})
	}

	/// Twitter credential from an OAuth 1.0 token + secret.
	pub fn twitter(token: impl Into<TokenSecret>, secret: impl Into<TokenSecret>) -> Result<Self> {
		Self::new(ProviderId::Twitter, OAuthCredentialParams {
			access_token: Some(token.into()),
			secret: Some(secret.into()),
			..Default::default()
		})
	}

	/// Provider assertion carried by the credential.
	pub fn params(&self) -> &OAuthCredentialParams {
		&self.params
	}

	pub(crate) fn from_json(value: serde_json::Value) -> Result<Self> {
		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct Payload {
			#[serde(default)]
			provider_id: Option<ProviderId>,
			sign_in_method: SignInMethod,
			#[serde(flatten)]
			params: OAuthCredentialParams,
		}

		let payload = credential::decode_json::<Payload>(value)?;
		let provider_id = payload.sign_in_method.provider_id();

		if payload.provider_id.is_some_and(|declared| declared != provider_id) {
			return Err(Error::invalid_credential(format!(
				"provider id does not match sign-in method `{}`",
				payload.sign_in_method
			)));
		}

		Self::new(provider_id, payload.params)
	}

	fn request(&self, id_token: Option<TokenSecret>) -> SignInWithIdpRequest {
		let params = &self.params;
		let post_body = if params.id_token.is_some() || params.access_token.is_some() {
			let mut form = form_urlencoded::Serializer::new(String::new());

			if let Some(token) = &params.id_token {
				form.append_pair("id_token", token.expose());
			}
			if let Some(token) = &params.access_token {
				form.append_pair("access_token", token.expose());
			}
			if let Some(secret) = &params.secret {
				form.append_pair("oauth_token_secret", secret.expose());
			}

			form.append_pair("providerId", self.provider_id.as_str());

			if let Some(nonce) = &params.nonce {
				form.append_pair("nonce", nonce);
			}

			Some(form.finish())
		} else {
			None
		};

		SignInWithIdpRequest {
			request_uri: IDP_REQUEST_URI.into(),
			pending_token: if post_body.is_none() { params.pending_token.clone() } else { None },
			post_body,
			id_token,
			return_idp_credential: true,
			return_secure_token: true,
		}
	}
}
impl CredentialExchange for OAuthCredential {
	fn provider_id(&self) -> ProviderId {
		self.provider_id
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
			self.provider_id,
			CredentialOperation::GetIdTokenResponse,
			api::sign_in_with_idp(auth, self.request(None)),
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
			self.provider_id,
			CredentialOperation::LinkToIdToken,
			api::sign_in_with_idp(auth, self.request(Some(TokenSecret::new(id_token)))),
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
			self.provider_id,
			CredentialOperation::MatchIdTokenWithUid,
			credential::verify_uid(api::sign_in_with_idp(auth, self.request(None)), uid),
		)
	}

	fn to_json(&self) -> Result<serde_json::Value> {
		let mut value = credential::encode_json(&self.params)?;

		if let Some(fields) = value.as_object_mut() {
			fields.insert("providerId".into(), self.provider_id.as_str().into());
			fields.insert("signInMethod".into(), self.sign_in_method.as_str().into());
		}

		Ok(value)
	}
}
