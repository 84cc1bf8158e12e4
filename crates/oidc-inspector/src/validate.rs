//! Document validator
//!
//! Required-field presence and per-field structural checks. Validation
//! findings are data, never errors: every check returns a status plus message
//! and nothing here can fail. All functions are pure and must be recomputed
//! whenever the loaded document changes.

use crate::classify::{CAPABILITY_KEYS, ENDPOINT_KEYS};
use crate::document::DiscoveryDocument;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Outcome category for a single checked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// The field satisfies its constraint.
    Pass,
    /// The field is missing or violates its constraint.
    Error,
    /// The outcome depends on an in-flight secondary fetch.
    Pending,
}

/// The outcome of checking one field's constraint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldValidation {
    pub status: FieldStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: FieldStatus::Pass,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: FieldStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn pending() -> Self {
        Self {
            status: FieldStatus::Pending,
            message: None,
        }
    }
}

/// The six fields OIDC Discovery requires of every provider, with the check
/// each must satisfy.
const REQUIRED_KEYS: [(&str, RequiredCheck); 6] = [
    ("issuer", RequiredCheck::NonBlankString),
    ("authorization_endpoint", RequiredCheck::NonBlankString),
    ("jwks_uri", RequiredCheck::NonBlankString),
    ("response_types_supported", RequiredCheck::NonEmptyArray),
    ("subject_types_supported", RequiredCheck::NonEmptyArray),
    (
        "id_token_signing_alg_values_supported",
        RequiredCheck::NonEmptyArray,
    ),
];

#[derive(Debug, Clone, Copy)]
enum RequiredCheck {
    NonBlankString,
    NonEmptyArray,
}

/// Return the required keys that are missing or fail their type check, in
/// declaration order.
pub fn validate_required(document: &DiscoveryDocument) -> Vec<&'static str> {
    REQUIRED_KEYS
        .iter()
        .filter(|(key, check)| !required_check_passes(document.get(key), *check))
        .map(|(key, _)| *key)
        .collect()
}

fn required_check_passes(value: Option<&Value>, check: RequiredCheck) -> bool {
    match (value, check) {
        (Some(Value::String(s)), RequiredCheck::NonBlankString) => !s.trim().is_empty(),
        (Some(Value::Array(items)), RequiredCheck::NonEmptyArray) => !items.is_empty(),
        _ => false,
    }
}

/// Check each endpoint field for presence and HTTPS-absolute-URL shape.
///
/// The `jwks_uri` entry produced here reflects only the bare URL check; once
/// it passes, the key-set cross-validator overrides it (see
/// [`crate::keyset::fold_key_set_status`]).
pub fn validate_endpoints(
    document: &DiscoveryDocument,
) -> HashMap<&'static str, FieldValidation> {
    ENDPOINT_KEYS
        .iter()
        .map(|&key| (key, validate_endpoint_value(document.get_str(key))))
        .collect()
}

fn validate_endpoint_value(value: Option<&str>) -> FieldValidation {
    let Some(raw) = value else {
        return FieldValidation::error("Missing");
    };

    let Ok(parsed) = Url::parse(raw) else {
        return FieldValidation::error("Invalid URL");
    };

    if parsed.scheme() != "https" {
        return FieldValidation::error("Must be HTTPS");
    }

    FieldValidation::pass("HTTPS absolute URL")
}

/// Check each capability field for presence and non-empty-array shape.
pub fn validate_capabilities(
    document: &DiscoveryDocument,
) -> HashMap<&'static str, FieldValidation> {
    CAPABILITY_KEYS
        .iter()
        .map(|&key| (key, validate_capability_value(document.get(key))))
        .collect()
}

fn validate_capability_value(value: Option<&Value>) -> FieldValidation {
    match value {
        None | Some(Value::Null) => FieldValidation::error("Missing"),
        Some(Value::Array(items)) if !items.is_empty() => {
            FieldValidation::pass(format!("{} items", items.len()))
        }
        Some(_) => FieldValidation::error("Expected non-empty array"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> DiscoveryDocument {
        DiscoveryDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_validate_required_empty_document_reports_all_six_in_order() {
        let missing = validate_required(&doc(json!({})));
        assert_eq!(
            missing,
            vec![
                "issuer",
                "authorization_endpoint",
                "jwks_uri",
                "response_types_supported",
                "subject_types_supported",
                "id_token_signing_alg_values_supported",
            ]
        );
    }

    #[test]
    fn test_validate_required_complete_document_reports_none() {
        let missing = validate_required(&doc(json!({
            "issuer": "https://x",
            "authorization_endpoint": "https://x/a",
            "jwks_uri": "https://x/j",
            "response_types_supported": ["code"],
            "subject_types_supported": ["public"],
            "id_token_signing_alg_values_supported": ["RS256"]
        })));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_validate_required_wrong_types_count_as_missing() {
        let missing = validate_required(&doc(json!({
            "issuer": ["https://x"],
            "authorization_endpoint": "  ",
            "jwks_uri": "https://x/j",
            "response_types_supported": "code",
            "subject_types_supported": [],
            "id_token_signing_alg_values_supported": ["RS256"]
        })));
        assert_eq!(
            missing,
            vec![
                "issuer",
                "authorization_endpoint",
                "response_types_supported",
                "subject_types_supported",
            ]
        );
    }

    #[test]
    fn test_validate_endpoints_empty_document_all_missing() {
        let results = validate_endpoints(&doc(json!({})));
        assert_eq!(results.len(), 9);
        for (key, validation) in &results {
            assert_eq!(
                *validation,
                FieldValidation::error("Missing"),
                "unexpected result for {key}"
            );
        }
    }

    #[test]
    fn test_validate_endpoints_rejects_plain_http() {
        let results = validate_endpoints(&doc(json!({
            "authorization_endpoint": "http://insecure.example/a"
        })));
        assert_eq!(
            results["authorization_endpoint"],
            FieldValidation::error("Must be HTTPS")
        );
    }

    #[test]
    fn test_validate_endpoints_rejects_unparseable_urls() {
        let results = validate_endpoints(&doc(json!({
            "token_endpoint": "not a url"
        })));
        assert_eq!(
            results["token_endpoint"],
            FieldValidation::error("Invalid URL")
        );
    }

    #[test]
    fn test_validate_endpoints_passes_https_absolute() {
        let results = validate_endpoints(&doc(json!({
            "issuer": "https://op.example",
            "jwks_uri": "https://op.example/jwks"
        })));
        assert_eq!(
            results["issuer"],
            FieldValidation::pass("HTTPS absolute URL")
        );
        assert_eq!(
            results["jwks_uri"],
            FieldValidation::pass("HTTPS absolute URL")
        );
    }

    #[test]
    fn test_validate_capabilities() {
        let results = validate_capabilities(&doc(json!({
            "scopes_supported": ["openid", "profile"],
            "grant_types_supported": [],
            "response_types_supported": "code",
            "claims_supported": null
        })));

        assert_eq!(
            results["scopes_supported"],
            FieldValidation::pass("2 items")
        );
        assert_eq!(
            results["grant_types_supported"],
            FieldValidation::error("Expected non-empty array")
        );
        assert_eq!(
            results["response_types_supported"],
            FieldValidation::error("Expected non-empty array")
        );
        assert_eq!(
            results["claims_supported"],
            FieldValidation::error("Missing")
        );
        assert_eq!(
            results["subject_types_supported"],
            FieldValidation::error("Missing")
        );
        assert_eq!(results.len(), 10);
    }
}
