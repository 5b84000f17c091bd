//! Typed calls to the identity backend's account endpoints.
//!
//! Every call follows the same pipeline: serialize the request body, inject the configured
//! tenant, POST it through the context's [`BackendHttpClient`], then either decode the
//! success body into a [`TokenResponse`] or classify the failure. Transport errors are
//! routed through the context's [`TransportErrorMapper`] so custom HTTP stacks control how
//! their failures surface.

pub mod endpoint;
pub mod requests;
pub mod server_error;

pub use endpoint::*;
pub use requests::*;
pub use server_error::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{Method, Request, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{AuthConfig, AuthContext},
	error::{ConfigError, TransientError, TransportError},
	http::{BackendHttpClient, ResponseMetadata, ResponseMetadataSlot},
	token::TokenResponse,
};

const CLIENT_VERSION_HEADER: &str = "x-client-version";
const LOCALE_HEADER: &str = "x-firebase-locale";

/// Maps HTTP transport failures into exchange [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an exchange error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(endpoint, meta, message),
			_ => map_generic_transport_error(endpoint, meta, "unknown failure"),
		}
	}
}

/// Creates a new anonymous account (`accounts:signUp`).
pub async fn sign_up<C, M>(auth: &AuthContext<C, M>, request: SignUpRequest) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	perform_request(auth, Endpoint::SignUp, &request).await
}

/// Verifies an email + password pair (`accounts:signInWithPassword`).
pub async fn sign_in_with_password<C, M>(
	auth: &AuthContext<C, M>,
	request: SignInWithPasswordRequest,
) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	perform_request(auth, Endpoint::SignInWithPassword, &request).await
}

/// Completes an email-link sign-in or link (`accounts:signInWithEmailLink`).
pub async fn sign_in_with_email_link<C, M>(
	auth: &AuthContext<C, M>,
	request: SignInWithEmailLinkRequest,
) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	perform_request(auth, Endpoint::SignInWithEmailLink, &request).await
}

/// Attaches an email + password to the session named by the request (`accounts:update`).
pub async fn update_account<C, M>(
	auth: &AuthContext<C, M>,
	request: UpdateAccountRequest,
) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	perform_request(auth, Endpoint::SetAccountInfo, &request).await
}

/// Exchanges a federated assertion (`accounts:signInWithIdp`).
///
/// A response flagged with `needConfirmation` means the provider identity already belongs
/// to an account with a different sign-in method; it is surfaced as a
/// [`ServerErrorCode::NeedConfirmation`] rejection instead of a session.
pub async fn sign_in_with_idp<C, M>(
	auth: &AuthContext<C, M>,
	request: SignInWithIdpRequest,
) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let response = send_request(auth, Endpoint::SignInWithIdp, &request).await?;
	let status = response.status().as_u16();
	let confirmation: IdpConfirmation = decode_response(status, response.body())?;

	if confirmation.need_confirmation {
		return Err(Error::Rejected {
			code: ServerErrorCode::NeedConfirmation,
			message: confirmation.email.map(|email| format!("account exists for {email}")),
			status: None,
		});
	}

	decode_response(status, response.body())
}

/// Completes a phone verification (`accounts:signInWithPhoneNumber`).
pub async fn sign_in_with_phone_number<C, M>(
	auth: &AuthContext<C, M>,
	request: SignInWithPhoneNumberRequest,
) -> Result<TokenResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	perform_request(auth, Endpoint::SignInWithPhoneNumber, &request).await
}

async fn perform_request<C, M, Req, Resp>(
	auth: &AuthContext<C, M>,
	endpoint: Endpoint,
	request: &Req,
) -> Result<Resp>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	Req: Serialize + Sync,
	Resp: DeserializeOwned,
{
	let response = send_request(auth, endpoint, request).await?;

	decode_response(response.status().as_u16(), response.body())
}

// Resolves to the response only when the backend answered with a success status.
async fn send_request<C, M, Req>(
	auth: &AuthContext<C, M>,
	endpoint: Endpoint,
	request: &Req,
) -> Result<HttpResponse>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	Req: Serialize + Sync,
{
	let http_request = build_request(&auth.config, endpoint, request)?;
	let meta = ResponseMetadataSlot::default();
	let handle = auth.http_client.with_metadata(meta.clone());
	let response = match handle.call(http_request).await {
		Ok(response) => response,
		Err(err) => {
			let captured = meta.take();

			return Err(auth.transport_mapper.map_transport_error(endpoint, captured.as_ref(), err));
		},
	};
	let retry_after = meta.take().and_then(|captured| captured.retry_after);

	if !response.status().is_success() {
		return Err(classify_failure(response.status().as_u16(), retry_after, response.body()));
	}

	Ok(response)
}

fn build_request<Req>(config: &AuthConfig, endpoint: Endpoint, request: &Req) -> Result<HttpRequest>
where
	Req: Serialize,
{
	let url = config.endpoint_url(endpoint)?;
	let mut body = serde_json::to_value(request).map_err(|source| ConfigError::Encode { source })?;

	if let (Some(tenant), Some(fields)) = (&config.tenant_id, body.as_object_mut()) {
		fields
			.entry("tenantId")
			.or_insert_with(|| serde_json::Value::String(tenant.to_string()));
	}

	let bytes = serde_json::to_vec(&body).map_err(|source| ConfigError::Encode { source })?;
	let mut builder = Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, "application/json");

	if let Some(version) = &config.client_version {
		builder = builder.header(CLIENT_VERSION_HEADER, version.as_str());
	}
	if let Some(code) = &config.language_code {
		builder = builder.header(LOCALE_HEADER, code.as_str());
	}

	Ok(builder.body(bytes).map_err(ConfigError::from)?)
}

fn decode_response<Resp>(status: u16, body: &[u8]) -> Result<Resp>
where
	Resp: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ResponseParse { source, status: Some(status) }.into())
}

// Flag the backend sets, without session tokens, when the federated identity belongs to an
// account that must be confirmed through another sign-in method first.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdpConfirmation {
	#[serde(default)]
	need_confirmation: bool,
	#[serde(default)]
	email: Option<String>,
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::Backend {
			code: None,
			message: format!("Request to {endpoint} timed out"),
			status: meta.and_then(|value| value.status).or_else(|| err.status().map(|s| s.as_u16())),
			retry_after: meta.and_then(|value| value.retry_after),
		}
		.into();
	}

	TransportError::from(err).into()
}

#[cfg(feature = "reqwest")]
fn map_generic_transport_error(
	endpoint: Endpoint,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	TransientError::Backend {
		code: None,
		message: format!("HTTP client error while calling {endpoint}: {message}"),
		status: meta.and_then(|value| value.status),
		retry_after: meta.and_then(|value| value.retry_after),
	}
	.into()
}
