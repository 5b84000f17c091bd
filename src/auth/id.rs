//! Strongly typed identifiers used to address the identity backend.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $allowed:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, $allowed)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, $allowed)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (API key, tenant).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (API key, tenant).
		kind: &'static str,
	},
	/// The identifier contains a character outside its permitted set.
	#[error("{kind} identifier contains invalid character {character:?}.")]
	InvalidCharacter {
		/// Kind of identifier (API key, tenant).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (API key, tenant).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! {
	ApiKey,
	"Project API key sent as the `key` query parameter.",
	"ApiKey",
	|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}
def_id! {
	TenantId,
	"Tenant identifier carried on backend requests.",
	"Tenant",
	|c: char| c.is_ascii_alphanumeric() || c == '-'
}

// API keys travel in the query string and tenant ids in request bodies, so both stay within
// URL-safe ASCII.
fn validate_view(
	kind: &'static str,
	view: &str,
	allowed: impl Fn(char) -> bool,
) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(character) = view.chars().find(|&c| !allowed(c)) {
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ApiKey::new(" key").is_err(), "Leading whitespace must be rejected.");
		assert!(ApiKey::new("key ").is_err(), "Trailing whitespace must be rejected.");
		assert_eq!(TenantId::new(""), Err(IdentifierError::Empty { kind: "Tenant" }));

		let key = ApiKey::new("AIzaSy-fixture").expect("API key fixture should be valid.");

		assert_eq!(key.as_ref(), "AIzaSy-fixture");
		assert_eq!(format!("{key:?}"), "ApiKey(AIzaSy-fixture)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let tenant: TenantId =
			serde_json::from_str("\"tenant-42\"").expect("Tenant should deserialize successfully.");

		assert_eq!(tenant.as_ref(), "tenant-42");
		assert!(serde_json::from_str::<TenantId>("\"with space\"").is_err());
		assert_eq!(
			serde_json::to_string(&tenant).expect("Tenant should serialize successfully."),
			"\"tenant-42\""
		);
	}

	#[test]
	fn identifiers_stay_within_their_character_sets() {
		ApiKey::new("AIzaSy_fixture-01").expect("Underscores are valid in API keys.");

		assert_eq!(
			ApiKey::new("key&other=1"),
			Err(IdentifierError::InvalidCharacter { kind: "ApiKey", character: '&' })
		);
		assert_eq!(
			TenantId::new("tenant_1"),
			Err(IdentifierError::InvalidCharacter { kind: "Tenant", character: '_' })
		);
		assert!("tenant/1".parse::<TenantId>().is_err());
		assert!(serde_json::from_str::<ApiKey>("\"k\u{e9}y\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("tenant{}id", '\u{00A0}');

		assert!(TenantId::new(&nbsp).is_err());

		TenantId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert_eq!(
			TenantId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { kind: "Tenant", max: IDENTIFIER_MAX_LEN })
		);
	}
}
