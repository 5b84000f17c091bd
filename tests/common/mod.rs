//! Shared fixtures for integration tests: config builders and an in-process transport that
//! records every request and answers from a script.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
// self
use identity_exchange::{
	api::{Endpoint, TransportErrorMapper},
	auth::{ApiKey, AuthConfig, AuthContext, ReqwestAuthContext, TenantId},
	error::{Error, TransportError},
	http::{
		BackendHttpClient, ResponseMetadata, ResponseMetadataSlot,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	},
	url::Url,
};

pub const API_KEY: &str = "test-api-key";
pub const API_HOST: &str = "identitytoolkit.googleapis.com";

pub fn api_key() -> ApiKey {
	ApiKey::new(API_KEY).expect("Test API key should be valid.")
}

pub fn endpoint_path(endpoint: Endpoint) -> String {
	format!("/{API_HOST}/{}", endpoint.path())
}

/// Context that routes every request to an emulator origin such as an `httpmock` server.
pub fn emulator_auth(origin: &str) -> ReqwestAuthContext {
	let config = AuthConfig::builder(api_key())
		.emulator(Url::parse(origin).expect("Emulator origin should parse."))
		.build()
		.expect("Emulator config should validate.");

	AuthContext::new(config)
}

/// Canonical successful exchange body for `local_id`.
pub fn token_body(local_id: &str) -> String {
	serde_json::json!({
		"idToken": "id-token",
		"refreshToken": "refresh-token",
		"expiresIn": "1234",
		"localId": local_id,
	})
	.to_string()
}

pub fn error_body(status: u16, message: &str) -> String {
	serde_json::json!({ "error": { "code": status, "message": message } }).to_string()
}

#[derive(Debug)]
pub enum FakeTransportError {
	ConnectionReset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Request captured by [`RecordingHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub uri: String,
	pub headers: Vec<(String, String)>,
	pub body: serde_json::Value,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}
}

enum Scripted {
	Respond(u16, String),
	Fail,
}

#[derive(Default)]
struct Recorder {
	requests: Mutex<Vec<RecordedRequest>>,
	script: Mutex<VecDeque<Scripted>>,
}

/// In-process transport that records requests and replays scripted responses in order.
#[derive(Clone, Default)]
pub struct RecordingHttpClient {
	recorder: Arc<Recorder>,
}
impl RecordingHttpClient {
	pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
		self.recorder.script.lock().push_back(Scripted::Respond(status, body.into()));

		self
	}

	pub fn fail(self) -> Self {
		self.recorder.script.lock().push_back(Scripted::Fail);

		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.recorder.requests.lock().clone()
	}

	pub fn only_request(&self) -> RecordedRequest {
		let requests = self.requests();

		assert_eq!(requests.len(), 1, "Exactly one request should have been sent.");

		requests.into_iter().next().expect("One request was asserted above.")
	}
}
impl BackendHttpClient for RecordingHttpClient {
	type Handle = RecordingHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		RecordingHandle { recorder: Arc::clone(&self.recorder), slot }
	}
}

pub struct RecordingHandle {
	recorder: Arc<Recorder>,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for RecordingHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		self.slot.take();

		let body = if request.body().is_empty() {
			serde_json::Value::Null
		} else {
			serde_json::from_slice(request.body()).expect("Request bodies should be JSON.")
		};
		let headers = request
			.headers()
			.iter()
			.map(|(key, value)| {
				(
					key.as_str().to_owned(),
					value.to_str().expect("Header values should be ASCII.").to_owned(),
				)
			})
			.collect();

		self.recorder.requests.lock().push(RecordedRequest {
			uri: request.uri().to_string(),
			headers,
			body,
		});

		let result = match self.recorder.script.lock().pop_front() {
			Some(Scripted::Respond(status, body)) => {
				self.slot.store(ResponseMetadata { status: Some(status), retry_after: None });

				let mut response = HttpResponse::new(body.into_bytes());

				*response.status_mut() =
					StatusCode::from_u16(status).expect("Scripted status should be valid.");

				Ok(response)
			},
			Some(Scripted::Fail) =>
				Err(HttpClientError::Reqwest(Box::new(FakeTransportError::ConnectionReset))),
			None => Err(HttpClientError::Other("No scripted response left.".into())),
		};

		Box::pin(async move { result })
	}
}

/// Mapper that records which endpoint failed and surfaces a network error.
#[derive(Clone, Default)]
pub struct RecordingMapper {
	pub failures: Arc<Mutex<Vec<Endpoint>>>,
}
impl TransportErrorMapper<FakeTransportError> for RecordingMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		_metadata: Option<&ResponseMetadata>,
		error: HttpClientError<FakeTransportError>,
	) -> Error {
		self.failures.lock().push(endpoint);

		match error {
			HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
			other => TransportError::network(std::io::Error::other(other.to_string())).into(),
		}
	}
}

pub type RecordingAuth = AuthContext<RecordingHttpClient, RecordingMapper>;

/// Context backed by `client`, optionally carrying a tenant id.
pub fn recording_auth(client: &RecordingHttpClient, tenant: Option<&str>) -> RecordingAuth {
	let mut builder = AuthConfig::builder(api_key());

	if let Some(tenant) = tenant {
		builder = builder.tenant_id(TenantId::new(tenant).expect("Tenant fixture should be valid."));
	}

	let config = builder.build().expect("Config fixture should validate.");

	AuthContext::with_http_client(config, client.clone(), RecordingMapper::default())
}
