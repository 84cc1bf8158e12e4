//! # OIDC Inspector
//!
//! Fetch and inspect OpenID Connect Discovery 1.0 and OAuth 2.0 Authorization
//! Server Metadata (RFC 8414) documents, validating their structure against
//! the relevant specifications.
//!
//! ## Overview
//!
//! Given an issuer base URL or a full document URL, the retriever resolves
//! the canonical `/.well-known/` discovery URL, fetches it, and parses the
//! body. The classifier then partitions the document's top-level fields into
//! endpoints, capability lists, and everything else; the validator checks
//! required-field presence and per-field constraints (HTTPS absoluteness,
//! non-empty arrays); and the key-set cross-validator follows `jwks_uri` to
//! confirm it resolves to a structurally valid JWK Set (RFC 7517).
//!
//! This is an inspection tool: it never joins a protocol flow, issues no
//! tokens, and verifies no signatures.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use oidc_inspector::{
//!     InspectorSession, KeySetAction, Retriever, WellKnownPath, classify, validate_required,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retriever = Retriever::new()?;
//! let mut session = InspectorSession::new(WellKnownPath::OpenIdConfiguration);
//!
//! let token = session.issue_request_token();
//! let fetched = retriever
//!     .fetch_document("https://accounts.example.com", session.well_known())
//!     .await?;
//!
//! if let Some(KeySetAction::IssueKeySetFetch) = session.accept_document(token, fetched) {
//!     let uri = session.key_set_uri().expect("action implies a key-set URI").to_string();
//!     let status = retriever.fetch_key_set(&uri).await;
//!     session.complete_key_set_fetch(status);
//! }
//!
//! let groups = session.classified().expect("document loaded");
//! for field in &groups.endpoints {
//!     println!("{}: {}", field.label, field.value);
//! }
//! for (key, validation) in session.endpoint_validations().expect("document loaded") {
//!     println!("{key}: {:?} {:?}", validation.status, validation.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Standards
//!
//! - **OpenID Connect Discovery 1.0**: `/.well-known/openid-configuration`
//! - **RFC 8414**: `/.well-known/oauth-authorization-server`
//! - **RFC 7517**: JSON Web Key Set structure (`keys` array presence only)
//!
//! URL resolution is a documented best-effort heuristic; RFC 8414 §3.1's
//! insert-before-path rule is not implemented (see [`retrieval`]).

pub mod classify;
pub mod document;
pub mod keyset;
pub mod retrieval;
pub mod session;
pub mod validate;

pub use classify::{CAPABILITY_KEYS, ClassifiedDocument, ENDPOINT_KEYS, classify};
pub use document::{DiscoveryDocument, DisplayField, field_label, flatten_value};
pub use keyset::{
    KeySetAction, KeySetEvent, KeySetFetchState, KeySetStatus, check_key_set,
    fold_key_set_status, has_key_set_uri,
};
pub use retrieval::{
    RetrievalError, RetrievalErrorKind, RetrievalResult, RetrievalSuccess, Retriever,
    RetrieverConfig, WellKnownPath, build_discovery_url, parse_pasted_document,
};
pub use session::{InspectorSession, RequestToken};
pub use validate::{
    FieldStatus, FieldValidation, validate_capabilities, validate_endpoints, validate_required,
};
