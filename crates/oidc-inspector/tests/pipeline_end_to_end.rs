//! End-to-end pipeline tests
//!
//! Drive a whole inspection the way a front end would: fetch the discovery
//! document, load it into a session, carry out the key-set fetch the session
//! requests, and read back the folded validations.

use oidc_inspector::{
    FieldStatus, FieldValidation, InspectorSession, KeySetAction, KeySetStatus, Retriever,
    WellKnownPath,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_discovery(server: &MockServer, jwks_body: serde_json::Value) {
    let issuer = server.uri();

    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": issuer,
            "authorization_endpoint": format!("{issuer}/auth"),
            "jwks_uri": format!("{issuer}/jwks"),
            "response_types_supported": ["code"],
            "subject_types_supported": ["public"],
            "id_token_signing_alg_values_supported": ["RS256"]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jwks"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body))
        .mount(server)
        .await;
}

async fn run_pipeline(jwks_body: serde_json::Value) -> InspectorSession {
    let server = MockServer::start().await;
    mount_discovery(&server, jwks_body).await;

    let retriever = Retriever::new().unwrap();
    let mut session = InspectorSession::new(WellKnownPath::OpenIdConfiguration);

    let token = session.issue_request_token();
    let fetched = retriever
        .fetch_document(&server.uri(), session.well_known())
        .await
        .unwrap();

    let action = session.accept_document(token, fetched);
    assert_eq!(action, Some(KeySetAction::IssueKeySetFetch));

    let uri = session.key_set_uri().unwrap().to_string();
    let status = retriever.fetch_key_set(&uri).await;
    session.complete_key_set_fetch(status);

    session
}

#[tokio::test]
async fn test_complete_document_with_empty_key_set_passes() {
    let session = run_pipeline(json!({"keys": []})).await;

    assert_eq!(session.required_missing().unwrap(), Vec::<&str>::new());
    assert_eq!(session.key_set_status(), KeySetStatus::Pass { key_count: 0 });

    let endpoints = session.endpoint_validations().unwrap();
    assert_eq!(
        endpoints["jwks_uri"],
        FieldValidation::pass("JWKS keys[]: 0")
    );
    assert_eq!(endpoints["issuer"].status, FieldStatus::Pass);
    assert_eq!(endpoints["authorization_endpoint"].status, FieldStatus::Pass);

    // userinfo_endpoint has no value, so it is absent from the endpoint
    // group even though its validation entry reports Missing.
    let groups = session.classified().unwrap();
    assert!(groups.endpoints.iter().all(|f| f.key != "userinfo_endpoint"));
    assert_eq!(endpoints["userinfo_endpoint"], FieldValidation::error("Missing"));
}

#[tokio::test]
async fn test_key_set_without_keys_array_fails_jwks_uri() {
    let session = run_pipeline(json!({"notkeys": []})).await;

    let endpoints = session.endpoint_validations().unwrap();
    assert_eq!(
        endpoints["jwks_uri"],
        FieldValidation::error("JWKS missing keys[]")
    );
    // The document itself still satisfies the required-field checks.
    assert_eq!(session.required_missing().unwrap(), Vec::<&str>::new());
}

#[tokio::test]
async fn test_key_set_http_failure_surfaces_as_error_status() {
    let server = MockServer::start().await;
    let issuer = server.uri();

    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": issuer,
            "jwks_uri": format!("{issuer}/jwks")
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let retriever = Retriever::new().unwrap();
    let mut session = InspectorSession::new(WellKnownPath::OpenIdConfiguration);
    let token = session.issue_request_token();
    let fetched = retriever
        .fetch_document(&server.uri(), session.well_known())
        .await
        .unwrap();
    session.accept_document(token, fetched);

    let uri = session.key_set_uri().unwrap().to_string();
    let status = retriever.fetch_key_set(&uri).await;
    session.complete_key_set_fetch(status);

    match session.key_set_status() {
        KeySetStatus::Error { message } => assert!(message.starts_with("HTTP 503")),
        other => panic!("expected error status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_partial_state_is_displayable_before_key_set_resolves() {
    let server = MockServer::start().await;
    mount_discovery(&server, json!({"keys": [{"kty": "RSA"}]})).await;

    let retriever = Retriever::new().unwrap();
    let mut session = InspectorSession::new(WellKnownPath::OpenIdConfiguration);
    let token = session.issue_request_token();
    let fetched = retriever
        .fetch_document(&server.uri(), session.well_known())
        .await
        .unwrap();
    session.accept_document(token, fetched);

    // The key-set fetch has not been carried out yet: the document renders
    // with jwks_uri pending, which is a valid displayable state.
    let endpoints = session.endpoint_validations().unwrap();
    assert_eq!(endpoints["jwks_uri"].status, FieldStatus::Pending);
    assert!(session.classified().is_some());
}
