//! Backend addressing configuration and its validating builder.

// self
use crate::{
	_prelude::*,
	api::Endpoint,
	auth::{ApiKey, TenantId},
	error::ConfigError,
};

/// Default identity backend host.
pub const DEFAULT_API_HOST: &str = "identitytoolkit.googleapis.com";
/// Default scheme used when no emulator is configured.
pub const DEFAULT_API_SCHEME: &str = "https";

/// Errors raised while validating an [`AuthConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AuthConfigError {
	/// The API host is empty.
	#[error("API host cannot be empty.")]
	MissingApiHost,
	/// The API host carries a scheme, path, or whitespace.
	#[error("API host `{host}` must be a bare host name.")]
	InvalidApiHost {
		/// Host value that failed validation.
		host: String,
	},
	/// Production endpoints must use HTTPS.
	#[error("API scheme must be https outside emulator mode, got `{scheme}`.")]
	InsecureScheme {
		/// Scheme value that failed validation.
		scheme: String,
	},
	/// The emulator origin is unusable.
	#[error("Emulator origin `{url}` is invalid: {reason}.")]
	InvalidEmulator {
		/// Origin that failed validation.
		url: String,
		/// Short reason string.
		reason: &'static str,
	},
}

/// Everything the exchange core needs to address the identity backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
	/// API key appended to every request.
	pub api_key: ApiKey,
	/// Backend host, without scheme.
	#[serde(default = "default_api_host")]
	pub api_host: String,
	/// Backend scheme used outside emulator mode.
	#[serde(default = "default_api_scheme")]
	pub api_scheme: String,
	/// Tenant id injected into request bodies.
	#[serde(default)]
	pub tenant_id: Option<TenantId>,
	/// Emulator origin; when set, requests go to `{origin}/{api_host}/v1/...`.
	#[serde(default)]
	pub emulator: Option<Url>,
	/// Value for the `X-Client-Version` header.
	#[serde(default)]
	pub client_version: Option<String>,
	/// Value for the `X-Firebase-Locale` header.
	#[serde(default)]
	pub language_code: Option<String>,
}
impl AuthConfig {
	/// Creates a builder seeded with the provided API key and production defaults.
	pub fn builder(api_key: ApiKey) -> AuthConfigBuilder {
		AuthConfigBuilder::new(api_key)
	}

	/// Validates invariants for the config.
	pub fn validate(&self) -> Result<(), AuthConfigError> {
		if self.api_host.is_empty() {
			return Err(AuthConfigError::MissingApiHost);
		}
		if self.api_host.contains('/') || self.api_host.chars().any(char::is_whitespace) {
			return Err(AuthConfigError::InvalidApiHost { host: self.api_host.clone() });
		}

		match &self.emulator {
			Some(origin) => validate_emulator(origin),
			None if self.api_scheme != "https" =>
				Err(AuthConfigError::InsecureScheme { scheme: self.api_scheme.clone() }),
			None => Ok(()),
		}
	}

	/// Resolves the full URL (including the `key` query parameter) for an endpoint.
	pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ConfigError> {
		let raw = match &self.emulator {
			Some(origin) => format!(
				"{}/{}/{}",
				origin.as_str().trim_end_matches('/'),
				self.api_host,
				endpoint.path()
			),
			None => format!("{}://{}/{}", self.api_scheme, self.api_host, endpoint.path()),
		};
		let mut url = Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		url.query_pairs_mut().append_pair("key", &self.api_key);

		Ok(url)
	}
}

/// Builder for [`AuthConfig`] values.
#[derive(Debug)]
pub struct AuthConfigBuilder {
	config: AuthConfig,
}
impl AuthConfigBuilder {
	/// Creates a new builder with production defaults.
	pub fn new(api_key: ApiKey) -> Self {
		Self {
			config: AuthConfig {
				api_key,
				api_host: default_api_host(),
				api_scheme: default_api_scheme(),
				tenant_id: None,
				emulator: None,
				client_version: None,
				language_code: None,
			},
		}
	}

	/// Overrides the backend host.
	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.config.api_host = host.into();

		self
	}

	/// Overrides the backend scheme.
	pub fn api_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.config.api_scheme = scheme.into();

		self
	}

	/// Sets the tenant id injected into request bodies.
	pub fn tenant_id(mut self, tenant: TenantId) -> Self {
		self.config.tenant_id = Some(tenant);

		self
	}

	/// Routes every request through an emulator origin.
	pub fn emulator(mut self, origin: Url) -> Self {
		self.config.emulator = Some(origin);

		self
	}

	/// Sets the `X-Client-Version` header value.
	pub fn client_version(mut self, version: impl Into<String>) -> Self {
		self.config.client_version = Some(version.into());

		self
	}

	/// Sets the `X-Firebase-Locale` header value.
	pub fn language_code(mut self, code: impl Into<String>) -> Self {
		self.config.language_code = Some(code.into());

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<AuthConfig, AuthConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

fn default_api_host() -> String {
	DEFAULT_API_HOST.into()
}

fn default_api_scheme() -> String {
	DEFAULT_API_SCHEME.into()
}

fn validate_emulator(origin: &Url) -> Result<(), AuthConfigError> {
	let invalid = |reason| AuthConfigError::InvalidEmulator { url: origin.to_string(), reason };

	if !matches!(origin.scheme(), "http" | "https") {
		return Err(invalid("scheme must be http or https"));
	}
	if origin.host_str().is_none() {
		return Err(invalid("host is missing"));
	}
	if origin.query().is_some() || origin.fragment().is_some() {
		return Err(invalid("query and fragment are not allowed"));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn api_key() -> ApiKey {
		ApiKey::new("api-key").expect("API key fixture should be valid.")
	}

	#[test]
	fn production_urls_use_scheme_host_and_key() {
		let config = AuthConfig::builder(api_key()).build().expect("Defaults should validate.");
		let url = config.endpoint_url(Endpoint::SignUp).expect("Sign-up URL should resolve.");

		assert_eq!(
			url.as_str(),
			"https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=api-key"
		);
	}

	#[test]
	fn emulator_urls_prefix_the_host_as_a_path() {
		let config = AuthConfig::builder(api_key())
			.emulator(Url::parse("http://127.0.0.1:9099/").expect("Origin should parse."))
			.build()
			.expect("Emulator config should validate.");
		let url = config
			.endpoint_url(Endpoint::SignInWithPassword)
			.expect("Password URL should resolve.");

		assert_eq!(
			url.as_str(),
			"http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=api-key"
		);
	}

	#[test]
	fn validation_rejects_insecure_or_malformed_settings() {
		let err = AuthConfig::builder(api_key())
			.api_scheme("http")
			.build()
			.expect_err("Plain HTTP must be rejected outside emulator mode.");

		assert_eq!(err, AuthConfigError::InsecureScheme { scheme: "http".into() });

		let err = AuthConfig::builder(api_key())
			.api_host("https://example.com")
			.build()
			.expect_err("Hosts carrying a scheme must be rejected.");

		assert!(matches!(err, AuthConfigError::InvalidApiHost { .. }));
		assert_eq!(
			AuthConfig::builder(api_key()).api_host("").build(),
			Err(AuthConfigError::MissingApiHost)
		);

		let err = AuthConfig::builder(api_key())
			.emulator(Url::parse("http://localhost:9099/?debug=1").expect("Origin should parse."))
			.build()
			.expect_err("Emulator origins with a query must be rejected.");

		assert!(matches!(err, AuthConfigError::InvalidEmulator { .. }));
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: AuthConfig =
			serde_json::from_str(r#"{"apiKey":"api-key","tenantId":"tenant-1"}"#)
				.expect("Minimal config should deserialize.");

		assert_eq!(config.api_host, DEFAULT_API_HOST);
		assert_eq!(config.api_scheme, DEFAULT_API_SCHEME);
		assert_eq!(config.tenant_id.as_deref(), Some("tenant-1"));
		assert!(config.validate().is_ok());
	}
}
