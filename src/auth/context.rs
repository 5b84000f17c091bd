//! Explicit context handed to every credential exchange.

// self
use crate::{_prelude::*, api::TransportErrorMapper, auth::AuthConfig, http::BackendHttpClient};
#[cfg(feature = "reqwest")]
use crate::{api::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Auth context specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthContext = AuthContext<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Configuration plus transport handles required to address the identity backend.
///
/// The context carries no session state. Cloning is cheap (the transport and mapper sit
/// behind `Arc`), and concurrent exchanges never contend on it.
pub struct AuthContext<C, M>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Backend addressing configuration.
	pub config: AuthConfig,
	/// HTTP client used for every outbound backend request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
}
impl<C, M> AuthContext<C, M>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a context that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: AuthConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { config, http_client: http_client.into(), transport_mapper: mapper.into() }
	}
}
#[cfg(feature = "reqwest")]
impl AuthContext<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a context backed by a default reqwest client.
	pub fn new(config: AuthConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Clone for AuthContext<C, M>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
		}
	}
}
impl<C, M> Debug for AuthContext<C, M>
where
	C: ?Sized + BackendHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthContext").field("config", &self.config).finish_non_exhaustive()
	}
}
