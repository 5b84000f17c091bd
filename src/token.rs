//! Normalized token response returned by every successful exchange.

pub mod secret;

pub use secret::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Tokens and identity data issued by the backend for one exchange.
///
/// The four required fields are carried exactly as the backend sent them. Provider-specific
/// fields are optional, and anything the crate does not model lands in [`extra`](Self::extra)
/// untouched. A response is never edited after creation; refreshes produce a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
	/// Short-lived bearer token.
	pub id_token: TokenSecret,
	/// Token used to mint new id tokens.
	pub refresh_token: TokenSecret,
	/// Seconds-to-live for `id_token`, string encoded.
	pub expires_in: String,
	/// Backend's stable user identifier.
	pub local_id: String,
	/// Backend response kind tag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Provider that authenticated the user, as reported by the backend.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provider_id: Option<String>,
	/// Whether the exchange created the account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_new_user: Option<bool>,
	/// Account email, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Account display name, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Account phone number, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
	/// Raw JSON profile returned by a federated provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub raw_user_info: Option<String>,
	/// Federated provider id token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub oauth_id_token: Option<TokenSecret>,
	/// Federated provider access token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub oauth_access_token: Option<TokenSecret>,
	/// Federated provider OAuth 1.0 token secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub oauth_token_secret: Option<TokenSecret>,
	/// Pending token for completing a federated flow later.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pending_token: Option<TokenSecret>,
	/// Set when the federated identity already belongs to another account.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub need_confirmation: bool,
	/// Backend fields without a dedicated slot.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl TokenResponse {
	/// Parses [`expires_in`](Self::expires_in) into a positive duration.
	pub fn expires_in_duration(&self) -> Result<Duration, ConfigError> {
		let secs = self
			.expires_in
			.trim()
			.parse::<i64>()
			.map_err(|_| ConfigError::InvalidExpiresIn { value: self.expires_in.clone() })?;

		if secs <= 0 {
			return Err(ConfigError::NonPositiveExpiresIn);
		}

		Ok(Duration::seconds(secs))
	}

	/// Computes the absolute expiry for a response received at `issued_at`.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Result<OffsetDateTime, ConfigError> {
		issued_at.checked_add(self.expires_in_duration()?).ok_or(ConfigError::ExpiresInOutOfRange)
	}
}
