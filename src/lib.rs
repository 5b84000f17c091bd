//! Credential-exchange core for identity clients. Turn anonymous, password, email-link,
//! federated, and phone credentials into normalized token exchanges with typed link and
//! re-authentication rules.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod credential;
pub mod error;
pub mod http;
pub mod obs;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::ReqwestTransportErrorMapper,
		auth::{ApiKey, AuthConfig, AuthContext, TenantId},
		http::ReqwestHttpClient,
	};

	/// Auth context alias used by reqwest-backed tests.
	pub type ReqwestTestAuth = AuthContext<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// API key shared by test fixtures.
	pub const TEST_API_KEY: &str = "test-api-key";

	/// Builds an [`AuthContext`] that targets an emulator origin such as an `httpmock` server.
	pub fn build_emulator_auth(origin: &str, tenant: Option<&str>) -> ReqwestTestAuth {
		let api_key = ApiKey::new(TEST_API_KEY).expect("Test API key should be valid.");
		let mut builder = AuthConfig::builder(api_key)
			.emulator(Url::parse(origin).expect("Emulator origin should parse successfully."));

		if let Some(tenant) = tenant {
			builder = builder
				.tenant_id(TenantId::new(tenant).expect("Test tenant identifier should be valid."));
		}

		let config = builder.build().expect("Emulator config should build successfully.");

		AuthContext::new(config)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
