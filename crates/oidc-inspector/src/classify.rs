//! Document classifier
//!
//! Partitions the top-level keys of a discovery document into three disjoint
//! groups: protocol endpoints, capability lists, and everything else. The
//! groups are determined by fixed membership lists; "other" is the complement.

use crate::document::{DiscoveryDocument, DisplayField, flatten_value};

/// Discovery-document fields whose value is a protocol endpoint URL.
pub const ENDPOINT_KEYS: [&str; 9] = [
    "issuer",
    "authorization_endpoint",
    "token_endpoint",
    "userinfo_endpoint",
    "jwks_uri",
    "registration_endpoint",
    "revocation_endpoint",
    "introspection_endpoint",
    "end_session_endpoint",
];

/// Discovery-document fields that enumerate a supported set of
/// algorithms/modes/scopes.
pub const CAPABILITY_KEYS: [&str; 10] = [
    "claims_supported",
    "scopes_supported",
    "code_challenge_methods_supported",
    "response_types_supported",
    "dpop_signing_alg_values_supported",
    "grant_types_supported",
    "id_token_signing_alg_values_supported",
    "response_modes_supported",
    "subject_types_supported",
    "token_endpoint_auth_methods_supported",
];

/// The three-way partition of a document's fields.
///
/// Every top-level key with a defined, non-empty value lands in exactly one
/// group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedDocument {
    /// Endpoint URL fields, in membership-list order.
    pub endpoints: Vec<DisplayField>,
    /// Capability list fields, in membership-list order.
    pub capabilities: Vec<DisplayField>,
    /// Every remaining field, in document order.
    pub other: Vec<DisplayField>,
}

/// Classify a discovery document into endpoint, capability and other fields.
///
/// Endpoint keys are included only when the raw value is a non-blank string;
/// non-string endpoint values are silently omitted, never coerced. Capability
/// and other values may be arrays (comma-joined), strings, objects
/// (pretty-printed) or scalars; anything flattening to a blank string is
/// omitted.
pub fn classify(document: &DiscoveryDocument) -> ClassifiedDocument {
    let mut classified = ClassifiedDocument::default();

    for key in ENDPOINT_KEYS {
        if let Some(value) = document.get_str(key) {
            classified
                .endpoints
                .push(DisplayField::new(key, value.to_string()));
        }
    }

    for key in CAPABILITY_KEYS {
        if let Some(value) = document.get(key)
            && let Some(rendered) = flatten_value(value)
        {
            classified
                .capabilities
                .push(DisplayField::new(key, rendered));
        }
    }

    for (key, value) in document.iter() {
        if ENDPOINT_KEYS.contains(&key.as_str()) || CAPABILITY_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(rendered) = flatten_value(value) {
            classified.other.push(DisplayField::new(key, rendered));
        }
    }

    classified
}
