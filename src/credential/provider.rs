//! Provider families, sign-in methods, and the operations credentials expose.

// self
use crate::_prelude::*;

/// Errors raised when parsing provider or sign-in method names.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderParseError {
	/// The provider id is not one this crate exchanges.
	#[error("Unknown provider id `{value}`.")]
	UnknownProvider {
		/// Value that failed to parse.
		value: String,
	},
	/// The sign-in method is not one this crate exchanges.
	#[error("Unknown sign-in method `{value}`.")]
	UnknownSignInMethod {
		/// Value that failed to parse.
		value: String,
	},
}

/// Provider family a credential belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
	/// Guest account with no identifying proof.
	#[serde(rename = "anonymous")]
	Anonymous,
	/// Email-based credentials (password or email link).
	#[serde(rename = "password")]
	Password,
	/// Phone number verification.
	#[serde(rename = "phone")]
	Phone,
	/// Google federated sign-in.
	#[serde(rename = "google.com")]
	Google,
	/// Facebook federated sign-in.
	#[serde(rename = "facebook.com")]
	Facebook,
	/// GitHub federated sign-in.
	#[serde(rename = "github.com")]
	GitHub,
	/// Twitter federated sign-in (OAuth 1.0 token + secret).
	#[serde(rename = "twitter.com")]
	Twitter,
}
impl ProviderId {
	/// Returns the wire identifier of the provider.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderId::Anonymous => "anonymous",
			ProviderId::Password => "password",
			ProviderId::Phone => "phone",
			ProviderId::Google => "google.com",
			ProviderId::Facebook => "facebook.com",
			ProviderId::GitHub => "github.com",
			ProviderId::Twitter => "twitter.com",
		}
	}

	/// Returns `true` for providers exchanged through `signInWithIdp`.
	pub const fn is_federated(self) -> bool {
		matches!(
			self,
			ProviderId::Google | ProviderId::Facebook | ProviderId::GitHub | ProviderId::Twitter
		)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProviderId {
	type Err = ProviderParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"anonymous" => ProviderId::Anonymous,
			"password" => ProviderId::Password,
			"phone" => ProviderId::Phone,
			"google.com" => ProviderId::Google,
			"facebook.com" => ProviderId::Facebook,
			"github.com" => ProviderId::GitHub,
			"twitter.com" => ProviderId::Twitter,
			other => return Err(ProviderParseError::UnknownProvider { value: other.into() }),
		})
	}
}

/// Concrete method used to prove identity; finer-grained than [`ProviderId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignInMethod {
	/// Anonymous sign-up.
	#[serde(rename = "anonymous")]
	Anonymous,
	/// Email + password.
	#[serde(rename = "password")]
	EmailPassword,
	/// Email + out-of-band link code.
	#[serde(rename = "emailLink")]
	EmailLink,
	/// Phone verification.
	#[serde(rename = "phone")]
	Phone,
	/// Google federated sign-in.
	#[serde(rename = "google.com")]
	Google,
	/// Facebook federated sign-in.
	#[serde(rename = "facebook.com")]
	Facebook,
	/// GitHub federated sign-in.
	#[serde(rename = "github.com")]
	GitHub,
	/// Twitter federated sign-in.
	#[serde(rename = "twitter.com")]
	Twitter,
}
impl SignInMethod {
	/// Returns the wire identifier of the sign-in method.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignInMethod::Anonymous => "anonymous",
			SignInMethod::EmailPassword => "password",
			SignInMethod::EmailLink => "emailLink",
			SignInMethod::Phone => "phone",
			SignInMethod::Google => "google.com",
			SignInMethod::Facebook => "facebook.com",
			SignInMethod::GitHub => "github.com",
			SignInMethod::Twitter => "twitter.com",
		}
	}

	/// Returns the provider family the method belongs to.
	pub const fn provider_id(self) -> ProviderId {
		match self {
			SignInMethod::Anonymous => ProviderId::Anonymous,
			SignInMethod::EmailPassword | SignInMethod::EmailLink => ProviderId::Password,
			SignInMethod::Phone => ProviderId::Phone,
			SignInMethod::Google => ProviderId::Google,
			SignInMethod::Facebook => ProviderId::Facebook,
			SignInMethod::GitHub => ProviderId::GitHub,
			SignInMethod::Twitter => ProviderId::Twitter,
		}
	}

	/// Returns the sign-in method of a federated provider.
	pub const fn federated(provider: ProviderId) -> Option<Self> {
		match provider {
			ProviderId::Google => Some(SignInMethod::Google),
			ProviderId::Facebook => Some(SignInMethod::Facebook),
			ProviderId::GitHub => Some(SignInMethod::GitHub),
			ProviderId::Twitter => Some(SignInMethod::Twitter),
			ProviderId::Anonymous | ProviderId::Password | ProviderId::Phone => None,
		}
	}
}
impl Display for SignInMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignInMethod {
	type Err = ProviderParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"anonymous" => SignInMethod::Anonymous,
			"password" => SignInMethod::EmailPassword,
			"emailLink" => SignInMethod::EmailLink,
			"phone" => SignInMethod::Phone,
			"google.com" => SignInMethod::Google,
			"facebook.com" => SignInMethod::Facebook,
			"github.com" => SignInMethod::GitHub,
			"twitter.com" => SignInMethod::Twitter,
			other => return Err(ProviderParseError::UnknownSignInMethod { value: other.into() }),
		})
	}
}

/// Operations of the credential contract, used in errors and observability labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialOperation {
	/// Exchange the credential for a fresh session.
	GetIdTokenResponse,
	/// Attach the credential to an existing session.
	LinkToIdToken,
	/// Re-verify the credential against a known user id.
	MatchIdTokenWithUid,
	/// Serialize the credential to JSON.
	ToJson,
	/// Rebuild the credential from JSON.
	FromJson,
}
impl CredentialOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialOperation::GetIdTokenResponse => "get_id_token_response",
			CredentialOperation::LinkToIdToken => "link_to_id_token",
			CredentialOperation::MatchIdTokenWithUid => "match_id_token_with_uid",
			CredentialOperation::ToJson => "to_json",
			CredentialOperation::FromJson => "from_json",
		}
	}
}
impl Display for CredentialOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sign_in_methods_map_to_their_provider() {
		assert_eq!(SignInMethod::EmailLink.provider_id(), ProviderId::Password);
		assert_eq!(SignInMethod::EmailPassword.provider_id(), ProviderId::Password);
		assert_eq!(SignInMethod::Twitter.provider_id(), ProviderId::Twitter);
		assert_eq!(SignInMethod::federated(ProviderId::GitHub), Some(SignInMethod::GitHub));
		assert_eq!(SignInMethod::federated(ProviderId::Phone), None);
	}

	#[test]
	fn names_parse_and_display_symmetrically() {
		for provider in [ProviderId::Anonymous, ProviderId::Google, ProviderId::Twitter] {
			assert_eq!(provider.to_string().parse::<ProviderId>(), Ok(provider));
		}

		assert_eq!("emailLink".parse::<SignInMethod>(), Ok(SignInMethod::EmailLink));
		assert_eq!(
			"apple.com".parse::<ProviderId>(),
			Err(ProviderParseError::UnknownProvider { value: "apple.com".into() })
		);
		assert!(ProviderId::Facebook.is_federated());
		assert!(!ProviderId::Anonymous.is_federated());
	}

	#[test]
	fn serde_uses_wire_names() {
		assert_eq!(
			serde_json::to_value(SignInMethod::EmailLink).expect("Method should serialize."),
			serde_json::json!("emailLink")
		);
		assert_eq!(
			serde_json::from_value::<ProviderId>(serde_json::json!("github.com"))
				.expect("Provider should deserialize."),
			ProviderId::GitHub
		);
	}
}
