//! Logical backend operations and their REST paths.

// self
use crate::_prelude::*;

/// Backend operations used by the credential variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// Creates a new account; anonymous when the body carries no identity.
	SignUp,
	/// Verifies an email + password pair.
	SignInWithPassword,
	/// Completes an email-link sign-in with an out-of-band code.
	SignInWithEmailLink,
	/// Exchanges a federated identity provider assertion.
	SignInWithIdp,
	/// Completes a phone verification.
	SignInWithPhoneNumber,
	/// Updates account attributes (used to link an email + password).
	SetAccountInfo,
}
impl Endpoint {
	/// Returns the versioned REST path relative to the API host.
	pub const fn path(self) -> &'static str {
		match self {
			Endpoint::SignUp => "v1/accounts:signUp",
			Endpoint::SignInWithPassword => "v1/accounts:signInWithPassword",
			Endpoint::SignInWithEmailLink => "v1/accounts:signInWithEmailLink",
			Endpoint::SignInWithIdp => "v1/accounts:signInWithIdp",
			Endpoint::SignInWithPhoneNumber => "v1/accounts:signInWithPhoneNumber",
			Endpoint::SetAccountInfo => "v1/accounts:update",
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::SignUp => "sign_up",
			Endpoint::SignInWithPassword => "sign_in_with_password",
			Endpoint::SignInWithEmailLink => "sign_in_with_email_link",
			Endpoint::SignInWithIdp => "sign_in_with_idp",
			Endpoint::SignInWithPhoneNumber => "sign_in_with_phone_number",
			Endpoint::SetAccountInfo => "set_account_info",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
