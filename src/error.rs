//! Exchange-level error types shared across credentials, the API layer, and transports.

// self
use crate::{
	_prelude::*,
	api::ServerErrorCode,
	credential::{CredentialOperation, ProviderId},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical exchange error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary backend failure; callers may retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Backend rejected the exchange with a structured error code.
	#[error("Backend rejected the exchange with {code}.")]
	Rejected {
		/// Parsed backend error code.
		code: ServerErrorCode,
		/// Optional detail appended to the backend code.
		message: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// The credential variant cannot perform the requested operation.
	#[error("The {provider} credential does not support {operation}.")]
	UnsupportedOperation {
		/// Provider family of the credential.
		provider: ProviderId,
		/// Operation that was refused.
		operation: CredentialOperation,
	},
	/// The verified identity belongs to a different user.
	#[error("Credential resolved to user `{actual}` instead of `{expected}`.")]
	UidMismatch {
		/// User id the caller expected.
		expected: String,
		/// User id resolved by the backend, or empty when the backend reported no user.
		actual: String,
	},
	/// The credential is malformed or incomplete.
	#[error("Credential is invalid: {reason}.")]
	InvalidCredential {
		/// Human-readable validation failure.
		reason: String,
	},
}
impl Error {
	/// Returns the coarse category callers branch on.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
			Self::UidMismatch { .. } => ErrorKind::UidMismatch,
			Self::InvalidCredential { .. } => ErrorKind::InvalidCredential,
			Self::Config(_) | Self::Transient(_) | Self::Transport(_) | Self::Rejected { .. } =>
				ErrorKind::BackendExchangeFailure,
		}
	}

	/// Returns the backend error code carried by rejections and classified transient failures.
	pub fn server_code(&self) -> Option<&ServerErrorCode> {
		match self {
			Self::Rejected { code, .. } => Some(code),
			Self::Transient(TransientError::Backend { code, .. }) => code.as_ref(),
			_ => None,
		}
	}

	/// Returns `true` when the failure is temporary and a later attempt may succeed.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Transient(_) | Self::Transport(_))
	}

	pub(crate) fn invalid_credential(reason: impl Into<String>) -> Self {
		Self::InvalidCredential { reason: reason.into() }
	}

	pub(crate) fn unsupported(provider: ProviderId, operation: CredentialOperation) -> Self {
		Self::UnsupportedOperation { provider, operation }
	}
}

/// Coarse error categories exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Operation is structurally inapplicable to the credential variant; never retry.
	UnsupportedOperation,
	/// Network, configuration, or backend-side failure while exchanging the credential.
	BackendExchangeFailure,
	/// The credential resolved to a different user than expected.
	UidMismatch,
	/// The credential failed local validation.
	InvalidCredential,
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint URL could not be assembled from the config.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request payload or credential could not be encoded as JSON.
	#[error("Payload could not be encoded as JSON.")]
	Encode {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// Token response carried an `expiresIn` value that is not an integer.
	#[error("The expiresIn value `{value}` is not a whole number of seconds.")]
	InvalidExpiresIn {
		/// Raw value returned by the backend.
		value: String,
	},
	/// Token response carried a non-positive `expiresIn` value.
	#[error("The expiresIn value must be positive.")]
	NonPositiveExpiresIn,
	/// Token response carried an `expiresIn` value beyond the representable range.
	#[error("The expiresIn value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Backend returned a retryable error (rate limiting, unavailability) or an unstructured one.
	#[error("Backend returned a retryable error: {message}.")]
	Backend {
		/// Parsed backend error code, when the body carried one.
		code: Option<ServerErrorCode>,
		/// Backend- or client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Backend responded with JSON that does not match the expected shape.
	#[error("Backend returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
