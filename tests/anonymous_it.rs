mod common;

// std
use std::{
	future::Future,
	task::{Context, Poll, Waker},
};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use identity_exchange::{
	api::Endpoint,
	credential::{
		AnonymousCredential, AuthCredential, CredentialExchange, CredentialOperation, ProviderId,
		SignInMethod,
	},
	error::{Error, ErrorKind},
};

#[test]
fn anonymous_identity_is_constant() {
	for credential in [AnonymousCredential::new(), AnonymousCredential] {
		assert_eq!(credential.provider_id(), ProviderId::Anonymous);
		assert_eq!(credential.sign_in_method(), SignInMethod::Anonymous);
	}

	let wrapped = AuthCredential::from(AnonymousCredential::new());

	assert_eq!(wrapped.provider_id(), ProviderId::Anonymous);
	assert_eq!(wrapped.sign_in_method(), SignInMethod::Anonymous);
}

#[test]
fn anonymous_to_json_fails_without_side_effects() {
	let client = RecordingHttpClient::default();
	let credential = AnonymousCredential::new();

	for _ in 0..2 {
		let err = credential.to_json().expect_err("Anonymous credentials never serialize.");

		assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
	}

	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn anonymous_link_fails_without_network() {
	let client = RecordingHttpClient::default().respond(200, token_body("local-id"));
	let auth = recording_auth(&client, None);
	let err = AnonymousCredential::new()
		.link_to_id_token(&auth, "existing-id-token")
		.await
		.expect_err("Anonymous link must fail.");

	assert!(matches!(
		err,
		Error::UnsupportedOperation {
			provider: ProviderId::Anonymous,
			operation: CredentialOperation::LinkToIdToken,
		}
	));
	assert!(client.requests().is_empty());
}

#[test]
fn anonymous_match_fails_on_first_poll() {
	let client = RecordingHttpClient::default().respond(200, token_body("uid"));
	let auth = recording_auth(&client, None);
	let credential = AuthCredential::from(AnonymousCredential::new());
	let mut fut = credential.match_id_token_with_uid(&auth, "uid");
	let mut cx = Context::from_waker(Waker::noop());

	match fut.as_mut().poll(&mut cx) {
		Poll::Ready(Err(err)) => {
			assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
			assert!(matches!(
				err,
				Error::UnsupportedOperation { operation: CredentialOperation::MatchIdTokenWithUid, .. }
			));
		},
		other => panic!("Match should resolve immediately with an error, got {other:?}."),
	}

	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn anonymous_sign_up_returns_backend_tokens_verbatim() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(endpoint_path(Endpoint::SignUp))
				.query_param("key", API_KEY)
				.header("content-type", "application/json");
			then.status(200).header("content-type", "application/json").body(token_body("local-id"));
		})
		.await;
	let auth = emulator_auth(&server.base_url());
	let response = AnonymousCredential::new()
		.get_id_token_response(&auth)
		.await
		.expect("Anonymous sign-up should succeed.");

	mock.assert_async().await;

	assert_eq!(response.id_token.expose(), "id-token");
	assert_eq!(response.refresh_token.expose(), "refresh-token");
	assert_eq!(response.expires_in, "1234");
	assert_eq!(response.local_id, "local-id");
}

#[tokio::test]
async fn anonymous_sign_up_sends_only_the_secure_token_flag() {
	let client = RecordingHttpClient::default().respond(200, token_body("local-id"));
	let auth = recording_auth(&client, None);

	AnonymousCredential::new()
		.get_id_token_response(&auth)
		.await
		.expect("Anonymous sign-up should succeed.");

	let request = client.only_request();

	assert_eq!(
		request.uri,
		format!("https://{API_HOST}/v1/accounts:signUp?key={API_KEY}")
	);
	assert_eq!(request.body, serde_json::json!({ "returnSecureToken": true }));
}

#[tokio::test]
async fn each_anonymous_instance_signs_up_independently() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(endpoint_path(Endpoint::SignUp));
			then.status(200).header("content-type", "application/json").body(token_body("local-id"));
		})
		.await;
	let auth = emulator_auth(&server.base_url());
	let first = AnonymousCredential::new();
	let second = AnonymousCredential::new();
	let (a, b) = tokio::join!(first.get_id_token_response(&auth), second.get_id_token_response(&auth));

	a.expect("First sign-up should succeed.");
	b.expect("Second sign-up should succeed.");
	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn sequential_sign_ups_each_reach_the_backend() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(endpoint_path(Endpoint::SignUp));
			then.status(200).header("content-type", "application/json").body(token_body("local-id"));
		})
		.await;
	let auth = emulator_auth(&server.base_url());
	let first = AnonymousCredential::new()
		.get_id_token_response(&auth)
		.await
		.expect("First sign-up should succeed.");

	mock.assert_calls_async(1).await;

	let second = AnonymousCredential::new()
		.get_id_token_response(&auth)
		.await
		.expect("Second sign-up should succeed.");

	mock.assert_calls_async(2).await;
	assert_eq!(first, second);
}

#[tokio::test]
async fn anonymous_sign_up_failure_propagates_as_backend_failure() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(endpoint_path(Endpoint::SignUp));
			then.status(400)
				.header("content-type", "application/json")
				.body(error_body(400, "ADMIN_ONLY_OPERATION"));
		})
		.await;
	let auth = emulator_auth(&server.base_url());
	let err = AnonymousCredential::new()
		.get_id_token_response(&auth)
		.await
		.expect_err("Disabled anonymous sign-up must fail.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::BackendExchangeFailure);
	assert_eq!(err.to_string(), "Backend rejected the exchange with ADMIN_ONLY_OPERATION.");
}
