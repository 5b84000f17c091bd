//! Request bodies for the account endpoints.
//!
//! Field names follow the backend's camelCase wire format. Optional fields are omitted
//! rather than sent as `null`; the tenant id is injected by the API layer, not here.

// self
use crate::{_prelude::*, token::TokenSecret};

/// `accounts:signUp` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
	/// Always `true`; asks the backend for an id + refresh token pair.
	pub return_secure_token: bool,
	/// Email for non-anonymous sign-ups.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Password for non-anonymous sign-ups.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<TokenSecret>,
}
impl SignUpRequest {
	/// Body that creates a new anonymous account.
	pub fn anonymous() -> Self {
		Self { return_secure_token: true, ..Default::default() }
	}
}

/// `accounts:signInWithPassword` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithPasswordRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
	/// Always `true`.
	pub return_secure_token: bool,
}

/// `accounts:signInWithEmailLink` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithEmailLinkRequest {
	/// Email the link was sent to.
	pub email: String,
	/// Out-of-band code carried by the link.
	pub oob_code: TokenSecret,
	/// Present when linking the email to an existing session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
}

/// `accounts:update` body used to attach an email + password to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
	/// Session being updated.
	pub id_token: TokenSecret,
	/// New email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// New password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<TokenSecret>,
	/// Always `true`; the update rotates the session tokens.
	pub return_secure_token: bool,
}

/// `accounts:signInWithIdp` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithIdpRequest {
	/// Continue URI echoed back by the backend; a fixed loopback value for headless callers.
	pub request_uri: String,
	/// Form-urlencoded provider assertion.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post_body: Option<String>,
	/// Pending token from an earlier, unfinished federated exchange.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pending_token: Option<TokenSecret>,
	/// Present when linking the provider to an existing session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
	/// Asks the backend to echo the provider credential.
	pub return_idp_credential: bool,
	/// Always `true`.
	pub return_secure_token: bool,
}

/// Secondary operation carried by a phone verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneOperation {
	/// Reauthenticate an existing user; the backend refuses to create a new account.
	Reauth,
}

/// `accounts:signInWithPhoneNumber` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithPhoneNumberRequest {
	/// Verification id returned when the SMS was sent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_info: Option<String>,
	/// SMS code entered by the user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<TokenSecret>,
	/// Proof issued by an earlier verification of the same number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temporary_proof: Option<TokenSecret>,
	/// Number the temporary proof was issued for.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
	/// Present when linking the phone number to an existing session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
	/// Secondary operation, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub operation: Option<PhoneOperation>,
}
