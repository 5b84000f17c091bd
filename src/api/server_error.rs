//! Backend error codes and the classification of failed responses.
//!
//! Failed calls answer with `{"error": {"code": 400, "message": "CODE : detail"}}`. The
//! leading token of `message` is the machine-readable code; anything after ` : ` is a
//! human-readable detail. Rate limiting, HTTP 429, and HTTP 5xx are treated as transient;
//! every other structured error is a rejection. Bodies without the envelope fall back to
//! transient so callers can retry with backoff.

// self
use crate::{_prelude::*, error::TransientError};

macro_rules! def_server_codes {
	($($variant:ident => $code:literal, $doc:literal;)*) => {
		/// Machine-readable error codes returned by the identity backend.
		#[derive(Clone, Debug, PartialEq, Eq, Hash)]
		pub enum ServerErrorCode {
			$(
				#[doc = $doc]
				$variant,
			)*
			/// Code not modeled by this crate.
			Other(String),
		}
		impl ServerErrorCode {
			/// Returns the wire representation of the code.
			pub fn as_str(&self) -> &str {
				match self {
					$(Self::$variant => $code,)*
					Self::Other(code) => code,
				}
			}

			/// Parses a wire code, keeping unknown values in [`ServerErrorCode::Other`].
			pub fn parse(raw: &str) -> Self {
				match raw {
					$($code => Self::$variant,)*
					other => Self::Other(other.to_owned()),
				}
			}
		}
	};
}

def_server_codes! {
	AdminOnlyOperation => "ADMIN_ONLY_OPERATION", "Operation requires admin credentials.";
	CredentialMismatch => "CREDENTIAL_MISMATCH", "Custom token belongs to a different project.";
	CredentialTooOldLoginAgain => "CREDENTIAL_TOO_OLD_LOGIN_AGAIN", "Recent sign-in required.";
	EmailExists => "EMAIL_EXISTS", "Email already belongs to another account.";
	EmailNotFound => "EMAIL_NOT_FOUND", "No account matches the email.";
	ExpiredOobCode => "EXPIRED_OOB_CODE", "Email action code expired.";
	FederatedUserIdAlreadyLinked => "FEDERATED_USER_ID_ALREADY_LINKED", "Federated identity already linked elsewhere.";
	InvalidCode => "INVALID_CODE", "Phone verification code is wrong.";
	InvalidEmail => "INVALID_EMAIL", "Email is malformed.";
	InvalidIdToken => "INVALID_ID_TOKEN", "Id token is invalid.";
	InvalidIdpResponse => "INVALID_IDP_RESPONSE", "Federated assertion was rejected.";
	InvalidOobCode => "INVALID_OOB_CODE", "Email action code is invalid.";
	InvalidPassword => "INVALID_PASSWORD", "Password is wrong.";
	InvalidPendingToken => "INVALID_PENDING_TOKEN", "Pending token is invalid.";
	InvalidPhoneNumber => "INVALID_PHONE_NUMBER", "Phone number is malformed.";
	InvalidSessionInfo => "INVALID_SESSION_INFO", "Phone verification id is invalid.";
	InvalidTemporaryProof => "INVALID_TEMPORARY_PROOF", "Phone temporary proof is invalid.";
	InvalidTenantId => "INVALID_TENANT_ID", "Tenant id is invalid.";
	MissingCode => "MISSING_CODE", "Phone verification code is missing.";
	MissingPassword => "MISSING_PASSWORD", "Password is missing.";
	MissingSessionInfo => "MISSING_SESSION_INFO", "Phone verification id is missing.";
	NeedConfirmation => "NEED_CONFIRMATION", "Federated identity belongs to an account with a different credential.";
	OperationNotAllowed => "OPERATION_NOT_ALLOWED", "Sign-in method is disabled for the project.";
	QuotaExceeded => "QUOTA_EXCEEDED", "Project quota exceeded.";
	SessionExpired => "SESSION_EXPIRED", "Phone verification session expired.";
	TenantIdMismatch => "TENANT_ID_MISMATCH", "Tenant id does not match the credential.";
	TokenExpired => "TOKEN_EXPIRED", "Id token expired.";
	TooManyAttemptsTryLater => "TOO_MANY_ATTEMPTS_TRY_LATER", "Rate limited.";
	UserDisabled => "USER_DISABLED", "Account is disabled.";
	UserNotFound => "USER_NOT_FOUND", "Account does not exist.";
	WeakPassword => "WEAK_PASSWORD", "Password does not meet the policy.";
}

impl ServerErrorCode {
	/// Returns `true` for codes that signal temporary conditions.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::TooManyAttemptsTryLater | Self::QuotaExceeded)
	}
}
impl Display for ServerErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
	#[serde(default)]
	message: Option<String>,
}

const BODY_PREVIEW_LIMIT: usize = 256;

/// Splits a backend `message` into its code and optional detail.
pub fn parse_error_message(message: &str) -> (ServerErrorCode, Option<String>) {
	match message.split_once(" : ") {
		Some((code, detail)) => (ServerErrorCode::parse(code.trim()), Some(detail.trim().to_owned())),
		None => (ServerErrorCode::parse(message.trim()), None),
	}
}

/// Converts a non-success response into the exchange error taxonomy.
pub(crate) fn classify_failure(
	status: u16,
	retry_after: Option<Duration>,
	body: &[u8],
) -> Error {
	let parsed = serde_json::from_slice::<ErrorEnvelope>(body)
		.ok()
		.and_then(|envelope| envelope.error.message)
		.filter(|message| !message.trim().is_empty())
		.map(|message| parse_error_message(&message));
	let transient_status = status == 429 || status >= 500;

	match parsed {
		Some((code, detail)) if transient_status || code.is_transient() => TransientError::Backend {
			message: detail.unwrap_or_else(|| code.to_string()),
			code: Some(code),
			status: Some(status),
			retry_after,
		}
		.into(),
		Some((code, message)) => Error::Rejected { code, message, status: Some(status) },
		None => TransientError::Backend {
			code: None,
			message: format!(
				"HTTP {status} without a structured error body: {}",
				truncate_preview(&String::from_utf8_lossy(body))
			),
			status: Some(status),
			retry_after,
		}
		.into(),
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
