//! Credential variants and the exchange contract they share.
//!
//! Every variant answers the same four operations. Variants that cannot perform one of
//! them (the anonymous credential cannot be linked, matched, or serialized) still implement
//! it and fail with [`Error::UnsupportedOperation`] before touching the network. Callers
//! that hold a mix of variants use the closed [`AuthCredential`] sum type.

pub mod anonymous;
pub mod email;
pub mod oauth;
pub mod phone;
pub mod provider;

pub use anonymous::*;
pub use email::*;
pub use oauth::*;
pub use phone::*;
pub use provider::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{ServerErrorCode, TransportErrorMapper},
	auth::AuthContext,
	error::ConfigError,
	http::BackendHttpClient,
	token::TokenResponse,
};

/// Boxed future returned by every exchange operation.
pub type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Contract implemented by every credential variant.
///
/// Exchange operations borrow the credential and the context for the lifetime of the
/// returned future and perform at most one backend round-trip. Nothing is retried; callers
/// decide whether a [`transient`](Error::is_transient) failure is worth another attempt.
pub trait CredentialExchange
where
	Self: Send + Sync,
{
	/// Provider family of the credential.
	fn provider_id(&self) -> ProviderId;

	/// Concrete sign-in method of the credential.
	fn sign_in_method(&self) -> SignInMethod;

	/// Exchanges the credential for a fresh session.
	fn get_id_token_response<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>;

	/// Attaches the credential to the account owning `id_token`.
	fn link_to_id_token<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		id_token: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>;

	/// Re-verifies the credential and requires it to resolve to `uid`.
	///
	/// Resolves to the verified session on success and to [`Error::UidMismatch`] when the
	/// credential belongs to another user or to no user at all.
	fn match_id_token_with_uid<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		uid: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>;

	/// Serializes the credential so it can be rebuilt with [`AuthCredential::from_json`].
	fn to_json(&self) -> Result<serde_json::Value>;

	/// Returns `true` when the variant can perform `operation` at all.
	fn supports(&self, operation: CredentialOperation) -> bool {
		let _ = operation;

		true
	}
}

/// Closed set of credential variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthCredential {
	/// Guest credential.
	Anonymous(AnonymousCredential),
	/// Email + password or email-link credential.
	Email(EmailAuthCredential),
	/// Federated provider credential.
	OAuth(OAuthCredential),
	/// Phone verification credential.
	Phone(PhoneAuthCredential),
}
impl AuthCredential {
	/// Rebuilds a credential from the output of [`CredentialExchange::to_json`].
	///
	/// The `signInMethod` field selects the variant. Anonymous credentials are never
	/// serialized, so their JSON is refused with [`Error::UnsupportedOperation`].
	pub fn from_json(value: serde_json::Value) -> Result<Self> {
		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct Header {
			sign_in_method: SignInMethod,
		}

		let header = decode_json::<Header>(value.clone())?;

		match header.sign_in_method {
			SignInMethod::Anonymous =>
				Err(Error::unsupported(ProviderId::Anonymous, CredentialOperation::FromJson)),
			SignInMethod::EmailPassword | SignInMethod::EmailLink =>
				EmailAuthCredential::from_json(value).map(Self::Email),
			SignInMethod::Phone => PhoneAuthCredential::from_json(value).map(Self::Phone),
			SignInMethod::Google
			| SignInMethod::Facebook
			| SignInMethod::GitHub
			| SignInMethod::Twitter => OAuthCredential::from_json(value).map(Self::OAuth),
		}
	}

	/// Parses a JSON string and rebuilds the credential it describes.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let value: serde_json::Value = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|err| Error::invalid_credential(format!("{err}")))?;

		Self::from_json(value)
	}
}

macro_rules! dispatch {
	($self:ident, $cred:ident => $body:expr) => {
		match $self {
			AuthCredential::Anonymous($cred) => $body,
			AuthCredential::Email($cred) => $body,
			AuthCredential::OAuth($cred) => $body,
			AuthCredential::Phone($cred) => $body,
		}
	};
}

impl CredentialExchange for AuthCredential {
	fn provider_id(&self) -> ProviderId {
		dispatch!(self, cred => cred.provider_id())
	}

	fn sign_in_method(&self) -> SignInMethod {
		dispatch!(self, cred => cred.sign_in_method())
	}

	fn get_id_token_response<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		dispatch!(self, cred => cred.get_id_token_response(auth))
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
		dispatch!(self, cred => cred.link_to_id_token(auth, id_token))
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
		dispatch!(self, cred => cred.match_id_token_with_uid(auth, uid))
	}

	fn to_json(&self) -> Result<serde_json::Value> {
		dispatch!(self, cred => cred.to_json())
	}

	fn supports(&self, operation: CredentialOperation) -> bool {
		dispatch!(self, cred => cred.supports(operation))
	}
}
impl From<AnonymousCredential> for AuthCredential {
	fn from(value: AnonymousCredential) -> Self {
		Self::Anonymous(value)
	}
}
impl From<EmailAuthCredential> for AuthCredential {
	fn from(value: EmailAuthCredential) -> Self {
		Self::Email(value)
	}
}
impl From<OAuthCredential> for AuthCredential {
	fn from(value: OAuthCredential) -> Self {
		Self::OAuth(value)
	}
}
impl From<PhoneAuthCredential> for AuthCredential {
	fn from(value: PhoneAuthCredential) -> Self {
		Self::Phone(value)
	}
}

/// Runs a sign-in exchange and requires the resolved account to be `expected`.
pub(crate) async fn verify_uid<Fut>(exchange: Fut, expected: &str) -> Result<TokenResponse>
where
	Fut: Future<Output = Result<TokenResponse>>,
{
	let response = match exchange.await {
		Ok(response) => response,
		Err(Error::Rejected { code: ServerErrorCode::UserNotFound, .. }) =>
			return Err(Error::UidMismatch { expected: expected.to_owned(), actual: String::new() }),
		Err(err) => return Err(err),
	};

	if response.local_id != expected {
		return Err(Error::UidMismatch { expected: expected.to_owned(), actual: response.local_id });
	}

	Ok(response)
}

pub(crate) fn encode_json<T>(payload: &T) -> Result<serde_json::Value>
where
	T: Serialize,
{
	Ok(serde_json::to_value(payload).map_err(|source| ConfigError::Encode { source })?)
}

pub(crate) fn decode_json<T>(value: serde_json::Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|err| {
		let path = err.path().to_string();
		let inner = err.into_inner();

		Error::invalid_credential(format!("{inner} at `{path}`"))
	})
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::invalid_credential(format!("{field} cannot be empty")));
	}

	Ok(())
}
