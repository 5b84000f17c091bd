//! Guest credential with no identifying proof.

// std
use std::future;
// self
use crate::{
	_prelude::*,
	api::{self, SignUpRequest, TransportErrorMapper},
	auth::AuthContext,
	credential::{CredentialExchange, CredentialOperation, ExchangeFuture, ProviderId, SignInMethod},
	http::BackendHttpClient,
	obs,
	token::TokenResponse,
};

/// Credential that signs a guest up without any identifying proof.
///
/// Each exchange creates a brand-new account, so two instances (or two calls on one
/// instance) never share a session. The credential carries nothing that could prove
/// ownership of an existing account; linking, matching, and serialization are refused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnonymousCredential;
impl AnonymousCredential {
	/// Creates a fresh anonymous credential.
	pub fn new() -> Self {
		Self
	}

	fn refuse<'a>(operation: CredentialOperation) -> ExchangeFuture<'a, TokenResponse> {
		Box::pin(future::ready(Err(Error::unsupported(ProviderId::Anonymous, operation))))
	}
}
impl CredentialExchange for AnonymousCredential {
	fn provider_id(&self) -> ProviderId {
		ProviderId::Anonymous
	}

	fn sign_in_method(&self) -> SignInMethod {
		SignInMethod::Anonymous
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
			ProviderId::Anonymous,
			CredentialOperation::GetIdTokenResponse,
			api::sign_up(auth, SignUpRequest::anonymous()),
		)
	}

	fn link_to_id_token<'a, C, M>(
		&'a self,
		_auth: &'a AuthContext<C, M>,
		_id_token: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		Self::refuse(CredentialOperation::LinkToIdToken)
	}

	fn match_id_token_with_uid<'a, C, M>(
		&'a self,
		_auth: &'a AuthContext<C, M>,
		_uid: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		Self::refuse(CredentialOperation::MatchIdTokenWithUid)
	}

	fn to_json(&self) -> Result<serde_json::Value> {
		Err(Error::unsupported(ProviderId::Anonymous, CredentialOperation::ToJson))
	}

	fn supports(&self, operation: CredentialOperation) -> bool {
		matches!(operation, CredentialOperation::GetIdTokenResponse)
	}
}
