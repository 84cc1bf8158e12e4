//! Retrieval orchestrator
//!
//! Resolves a user-supplied base URL or full document URL into the canonical
//! discovery URL, performs the fetch, and normalizes every transport/parse
//! failure into a typed result. Nothing propagates as a panic or uncaught
//! error past this boundary.
//!
//! ## URL resolution
//!
//! Best-effort heuristic, not strict RFC 8414/OIDC resolution:
//!
//! 1. If the input already contains the canonical path, use it unmodified.
//! 2. Otherwise parse it; if the path is empty or `/`, append the canonical
//!    path (never double-slashing).
//! 3. If parsing fails, perform the same append on the raw string.
//!
//! RFC 8414 §3.1's insert-before-path rule for issuers with a non-root path
//! is deliberately not implemented; such inputs are treated as full document
//! URLs and fetched as-is.

use crate::document::DiscoveryDocument;
use crate::keyset::{KeySetStatus, check_key_set};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Maximum number of body characters carried in HTTP and parse error details.
const BODY_EXCERPT_LIMIT: usize = 500;

/// The two canonical well-known documents, selectable as independent
/// instances of the same pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownPath {
    /// OpenID Connect Discovery 1.0.
    OpenIdConfiguration,
    /// RFC 8414 OAuth 2.0 authorization server metadata.
    OauthAuthorizationServer,
}

impl WellKnownPath {
    /// The canonical path, with leading slash.
    pub fn path(self) -> &'static str {
        match self {
            Self::OpenIdConfiguration => "/.well-known/openid-configuration",
            Self::OauthAuthorizationServer => "/.well-known/oauth-authorization-server",
        }
    }
}

/// Coarse error category, exposed so callers can branch on taxonomy instead
/// of matching message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalErrorKind {
    EmptyInput,
    MalformedUrl,
    Http,
    /// Connectivity-level failure (unreachable host, refused connection,
    /// blocked cross-origin request). Drives distinct remediation UI.
    Blocked,
    Network,
    JsonParse,
    PastedJson,
}

/// A failed retrieval, normalized at the orchestrator boundary.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// The user submitted no URL.
    #[error("No URL provided")]
    EmptyInput,

    /// The resolved URL fails basic URL construction.
    #[error("Malformed URL: {reason}")]
    MalformedUrl { reason: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        /// Up to 500 characters of the response body.
        detail: String,
    },

    /// Transport failure classified as connectivity/cross-origin blocking.
    #[error("Network/CORS error")]
    Blocked {
        /// Fixed explanatory detail for remediation.
        detail: String,
    },

    /// Any other transport failure.
    #[error("Network error: {detail}")]
    Network { detail: String },

    /// The body was fetched but is not valid JSON (or not a JSON object).
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        /// Up to 500 characters of the unparsed body.
        body_excerpt: String,
    },

    /// A pasted document failed to parse. No network round-trip bounds the
    /// message, so it is carried in full.
    #[error("JSON parse error: {message}")]
    PastedJson { message: String },
}

impl RetrievalError {
    /// The taxonomy category of this error.
    pub fn kind(&self) -> RetrievalErrorKind {
        match self {
            Self::EmptyInput => RetrievalErrorKind::EmptyInput,
            Self::MalformedUrl { .. } => RetrievalErrorKind::MalformedUrl,
            Self::Http { .. } => RetrievalErrorKind::Http,
            Self::Blocked { .. } => RetrievalErrorKind::Blocked,
            Self::Network { .. } => RetrievalErrorKind::Network,
            Self::JsonParse { .. } => RetrievalErrorKind::JsonParse,
            Self::PastedJson { .. } => RetrievalErrorKind::PastedJson,
        }
    }

    /// The numeric status code, for HTTP errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error detail text, where the variant carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. }
            | Self::Blocked { detail }
            | Self::Network { detail } => Some(detail),
            Self::JsonParse { body_excerpt, .. } => Some(body_excerpt),
            _ => None,
        }
    }
}

/// Fixed remediation detail for connectivity-class failures.
const BLOCKED_DETAIL: &str = "The server could not be reached. It may be down, unreachable from \
     this network, or refusing cross-origin requests; try fetching the \
     document manually and pasting it instead.";

/// A successful retrieval. Exactly one of success/failure is ever populated:
/// failure is the `Err` arm of [`RetrievalResult`].
#[derive(Debug, Clone)]
pub struct RetrievalSuccess {
    /// The parsed document.
    pub document: DiscoveryDocument,
    /// The raw response body, byte-for-byte.
    pub raw_json: String,
}

/// Outcome of an attempted fetch.
pub type RetrievalResult = Result<RetrievalSuccess, RetrievalError>;

/// Resolve a user-supplied URL into the discovery URL to fetch.
///
/// See the module docs for the heuristic and its documented simplification.
pub fn build_discovery_url(input: &str, canonical_path: &str) -> String {
    if input.contains(canonical_path) {
        return input.to_string();
    }

    match Url::parse(input) {
        Ok(parsed) if parsed.path().is_empty() || parsed.path() == "/" => {
            format!("{}{}", input.trim_end_matches('/'), canonical_path)
        }
        // Non-root path: treated as a full document URL, used unmodified.
        Ok(_) => input.to_string(),
        // Malformed input: best-effort append on the raw string; the fetch
        // will surface the malformed-URL error if it is still unusable.
        Err(_) => format!("{}{}", input.trim_end_matches('/'), canonical_path),
    }
}

/// Configuration for the retriever.
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Request timeout (default: 10 seconds).
    pub request_timeout: Duration,
    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: format!("oidc-inspector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Discovery and key-set document retriever.
///
/// Issues `GET` requests with `Accept: application/json`, follows redirects,
/// and converts every failure mode into [`RetrievalError`]. Idempotent and
/// side-effect-free beyond the network call itself: repeated calls with the
/// same URL and equivalent server state return equivalent results.
#[derive(Debug, Clone)]
pub struct Retriever {
    client: reqwest::Client,
}

impl Retriever {
    /// Create a retriever with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new() -> Result<Self, RetrievalError> {
        Self::with_config(RetrieverConfig::default())
    }

    /// Create a retriever with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn with_config(config: RetrieverConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RetrievalError::Network {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    /// Fetch and parse a discovery document.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError`] for empty input, malformed URLs, non-2xx
    /// responses, transport failures, and unparseable bodies.
    pub async fn fetch_document(
        &self,
        input: &str,
        well_known: WellKnownPath,
    ) -> RetrievalResult {
        let input = input.trim();
        if input.is_empty() {
            return Err(RetrievalError::EmptyInput);
        }

        let resolved = build_discovery_url(input, well_known.path());
        debug!("Fetching discovery document: {}", resolved);

        // The resolution heuristic is best-effort; the resolved URL still has
        // to construct before a request can be issued.
        Url::parse(&resolved).map_err(|e| RetrievalError::MalformedUrl {
            reason: format!("{e}: {resolved}"),
        })?;

        let raw_json = self.fetch_json_body(&resolved).await?;
        parse_document_body(&raw_json)
    }

    /// Fetch a key-set document from `jwks_uri` and check it structurally.
    ///
    /// Every failure mode folds into [`KeySetStatus::Error`]; this never
    /// returns `Pending` and never fails outright.
    pub async fn fetch_key_set(&self, jwks_uri: &str) -> KeySetStatus {
        debug!("Fetching key set: {}", jwks_uri);

        let body = match self.fetch_json_body(jwks_uri).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Key-set fetch failed for {}: {}", jwks_uri, e);
                return KeySetStatus::Error {
                    message: e.to_string(),
                };
            }
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => check_key_set(&value),
            Err(e) => KeySetStatus::Error {
                message: format!("JSON parse error: {e}"),
            },
        }
    }

    /// Issue the GET and return the body of a 2xx response.
    async fn fetch_json_body(&self, url: &str) -> Result<String, RetrievalError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            warn!("Non-2xx discovery response from {}: {}", url, status);
            return Err(RetrievalError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                detail: excerpt(&body),
            });
        }

        Ok(body)
    }
}

/// Parse a pasted document through the identical pipeline as a fetched one.
///
/// # Errors
///
/// Returns [`RetrievalError::PastedJson`] with the parser's full message (no
/// truncation; there is no network round-trip to bound).
pub fn parse_pasted_document(raw: &str) -> RetrievalResult {
    let value: Value = serde_json::from_str(raw).map_err(|e| RetrievalError::PastedJson {
        message: e.to_string(),
    })?;

    match DiscoveryDocument::from_value(value) {
        Some(document) => Ok(RetrievalSuccess {
            document,
            raw_json: raw.to_string(),
        }),
        None => Err(RetrievalError::PastedJson {
            message: "expected a JSON object".to_string(),
        }),
    }
}

/// Parse a fetched body, reporting parse failures with a bounded excerpt.
fn parse_document_body(raw_json: &str) -> RetrievalResult {
    let value: Value =
        serde_json::from_str(raw_json).map_err(|e| RetrievalError::JsonParse {
            message: e.to_string(),
            body_excerpt: excerpt(raw_json),
        })?;

    match DiscoveryDocument::from_value(value) {
        Some(document) => Ok(RetrievalSuccess {
            document,
            raw_json: raw_json.to_string(),
        }),
        None => Err(RetrievalError::JsonParse {
            message: "expected a JSON object".to_string(),
            body_excerpt: excerpt(raw_json),
        }),
    }
}

/// Classify a transport-level failure by inspecting the failure itself and
/// its message: connectivity-class failures (refused, unreachable, DNS,
/// timeout, cross-origin blocking) get the distinguished `Blocked` kind with
/// a fixed remediation detail.
fn classify_transport_error(error: reqwest::Error) -> RetrievalError {
    let message = error.to_string();
    let lowered = message.to_lowercase();

    let connectivity = error.is_connect()
        || error.is_timeout()
        || lowered.contains("dns")
        || lowered.contains("connection refused")
        || lowered.contains("unreachable")
        || lowered.contains("cors")
        || lowered.contains("cross-origin");

    if connectivity {
        RetrievalError::Blocked {
            detail: BLOCKED_DETAIL.to_string(),
        }
    } else {
        RetrievalError::Network { detail: message }
    }
}

/// First 500 characters of a body, for error details.
fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OIDC_PATH: &str = "/.well-known/openid-configuration";
    const OAUTH_PATH: &str = "/.well-known/oauth-authorization-server";

    #[test]
    fn test_build_url_appends_canonical_path() {
        assert_eq!(
            build_discovery_url("https://issuer.example", OIDC_PATH),
            "https://issuer.example/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_build_url_never_double_slashes() {
        assert_eq!(
            build_discovery_url("https://issuer.example/", OIDC_PATH),
            "https://issuer.example/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_build_url_passes_through_full_document_urls() {
        let full = "https://issuer.example/.well-known/openid-configuration";
        assert_eq!(build_discovery_url(full, OIDC_PATH), full);

        // A non-root path without the canonical path is treated as a full
        // document URL (RFC 8414 path insertion is not implemented).
        let tenant = "https://issuer.example/tenants/a/metadata.json";
        assert_eq!(build_discovery_url(tenant, OIDC_PATH), tenant);
    }

    #[test]
    fn test_build_url_raw_append_fallback_for_unparseable_input() {
        assert_eq!(
            build_discovery_url("issuer.example", OAUTH_PATH),
            "issuer.example/.well-known/oauth-authorization-server"
        );
        assert_eq!(
            build_discovery_url("issuer.example/", OAUTH_PATH),
            "issuer.example/.well-known/oauth-authorization-server"
        );
    }

    #[test]
    fn test_well_known_paths() {
        assert_eq!(
            WellKnownPath::OpenIdConfiguration.path(),
            "/.well-known/openid-configuration"
        );
        assert_eq!(
            WellKnownPath::OauthAuthorizationServer.path(),
            "/.well-known/oauth-authorization-server"
        );
    }

    #[test]
    fn test_paste_path_parses_objects_only() {
        let ok = parse_pasted_document(r#"{"issuer": "https://x"}"#).unwrap();
        assert_eq!(ok.document.get_str("issuer"), Some("https://x"));
        assert_eq!(ok.raw_json, r#"{"issuer": "https://x"}"#);

        let err = parse_pasted_document("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), RetrievalErrorKind::PastedJson);
    }

    #[test]
    fn test_paste_parse_error_carries_full_message() {
        let err = parse_pasted_document("{nope").unwrap_err();
        let RetrievalError::PastedJson { message } = err else {
            panic!("expected PastedJson");
        };
        // The serde_json message, untruncated, including position info.
        assert!(message.contains("line 1"));
    }

    #[test]
    fn test_fetched_parse_error_excerpt_is_bounded() {
        let body = format!("<html>{}</html>", "x".repeat(2000));
        let err = parse_document_body(&body).unwrap_err();
        let RetrievalError::JsonParse { body_excerpt, .. } = err else {
            panic!("expected JsonParse");
        };
        assert_eq!(body_excerpt.chars().count(), 500);
        assert!(body_excerpt.starts_with("<html>"));
    }

    #[test]
    fn test_error_taxonomy_accessors() {
        let http = RetrievalError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
            detail: "gone".to_string(),
        };
        assert_eq!(http.kind(), RetrievalErrorKind::Http);
        assert_eq!(http.status_code(), Some(404));
        assert_eq!(http.to_string(), "HTTP 404 Not Found");

        assert_eq!(RetrievalError::EmptyInput.kind(), RetrievalErrorKind::EmptyInput);
        assert_eq!(RetrievalError::EmptyInput.status_code(), None);
    }
}
