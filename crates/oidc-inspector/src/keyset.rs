//! Key-set cross-validator
//!
//! Determines whether `jwks_uri` not only looks like a valid HTTPS URL but
//! actually resolves to a structurally valid JSON Web Key Set (RFC 7517):
//! a JSON object with an array-typed `keys` field. Key material itself is
//! passed through uninterpreted; nothing cryptographic happens here.
//!
//! The fetch is driven externally. This module only interprets its three
//! possible states and folds the outcome into the endpoint validation map,
//! plus an explicit transition table that makes the at-most-once fetch guard
//! structural rather than an ad hoc conditional.

use crate::document::DiscoveryDocument;
use crate::validate::{FieldStatus, FieldValidation};
use serde_json::Value;

/// True iff the document carries a usable key-set URI: `jwks_uri` present as
/// a non-blank string.
pub fn has_key_set_uri(document: &DiscoveryDocument) -> bool {
    document.get_str("jwks_uri").is_some()
}

/// Outcome of the key-set check for the currently loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySetStatus {
    /// No fetch attempt has completed yet for the current document.
    Pending,
    /// The body is a JSON object with an array `keys` field. An empty array
    /// still passes; this is a structural check only.
    Pass { key_count: usize },
    /// The fetch failed, or the body is not an object, or `keys` is missing
    /// or not an array.
    Error { message: String },
}

impl KeySetStatus {
    /// Render this status as a per-field validation entry.
    pub fn to_field_validation(&self) -> FieldValidation {
        match self {
            Self::Pending => FieldValidation::pending(),
            Self::Pass { key_count } => {
                FieldValidation::pass(format!("JWKS keys[]: {key_count}"))
            }
            Self::Error { message } => FieldValidation::error(message.clone()),
        }
    }
}

/// Structurally check a fetched key-set body.
///
/// Never returns [`KeySetStatus::Pending`]; a body in hand means the fetch
/// completed.
pub fn check_key_set(body: &Value) -> KeySetStatus {
    let Value::Object(map) = body else {
        return KeySetStatus::Error {
            message: "JWKS response is not a JSON object".to_string(),
        };
    };

    match map.get("keys") {
        Some(Value::Array(keys)) => KeySetStatus::Pass {
            key_count: keys.len(),
        },
        _ => KeySetStatus::Error {
            message: "JWKS missing keys[]".to_string(),
        },
    }
}

/// Fold the key-set outcome into the `jwks_uri` endpoint validation.
///
/// Only a `jwks_uri` entry that already passed its bare URL check is
/// overridden; a missing/invalid/non-HTTPS finding takes precedence and the
/// key-set outcome is not consulted.
pub fn fold_key_set_status(
    endpoints: &mut std::collections::HashMap<&'static str, FieldValidation>,
    status: &KeySetStatus,
) {
    if let Some(entry) = endpoints.get_mut("jwks_uri")
        && entry.status == FieldStatus::Pass
    {
        *entry = status.to_field_validation();
    }
}

/// State of the key-set fetch for the currently loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySetFetchState {
    /// No fetch has been issued (fresh document, or no key-set URI).
    Idle,
    /// A fetch was issued and has not yet completed.
    InFlight,
    /// A fetch completed (successfully or not) for the current document.
    Resolved(KeySetStatus),
}

impl KeySetFetchState {
    /// The status to display for this state.
    pub fn status(&self) -> KeySetStatus {
        match self {
            Self::Idle | Self::InFlight => KeySetStatus::Pending,
            Self::Resolved(status) => status.clone(),
        }
    }
}

/// Events that drive the key-set fetch state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySetEvent {
    /// A new document was loaded (resets any prior key-set state).
    DocumentLoaded { has_key_set_uri: bool },
    /// The user navigated to a dedicated key-set view.
    KeySetViewOpened,
    /// The in-flight fetch completed with the given outcome.
    FetchCompleted(KeySetStatus),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySetAction {
    /// Issue the key-set fetch for the current document's `jwks_uri`.
    IssueKeySetFetch,
}

/// Transition table for the key-set fetch.
///
/// A fetch is issued only from `Idle` with a key-set URI present, so the
/// at-most-once-per-trigger guard is an invariant of the table: while
/// `InFlight` or `Resolved`, neither trigger event produces a side effect.
pub fn transition(
    state: &KeySetFetchState,
    event: &KeySetEvent,
) -> (KeySetFetchState, Option<KeySetAction>) {
    match (state, event) {
        // Loading a document always resets; fetch only when a URI exists.
        (_, KeySetEvent::DocumentLoaded { has_key_set_uri: true }) => {
            (KeySetFetchState::InFlight, Some(KeySetAction::IssueKeySetFetch))
        }
        (_, KeySetEvent::DocumentLoaded { has_key_set_uri: false }) => {
            (KeySetFetchState::Idle, None)
        }

        // Opening the key-set view triggers a fetch only if none was issued.
        (KeySetFetchState::Idle, KeySetEvent::KeySetViewOpened) => {
            (KeySetFetchState::InFlight, Some(KeySetAction::IssueKeySetFetch))
        }
        (state, KeySetEvent::KeySetViewOpened) => (state.clone(), None),

        // Completion is only meaningful while in flight; a stray completion
        // after a reset is dropped.
        (KeySetFetchState::InFlight, KeySetEvent::FetchCompleted(status)) => {
            (KeySetFetchState::Resolved(status.clone()), None)
        }
        (state, KeySetEvent::FetchCompleted(_)) => (state.clone(), None),
    }
}
