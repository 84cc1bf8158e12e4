//! Inspector session state
//!
//! The one mutable state holder: the currently loaded document, the key-set
//! fetch state machine, and the request-sequence guard against out-of-order
//! responses. Classification and validation stay pure; the session calls into
//! them and never caches derived views past a document load.

use crate::classify::{ClassifiedDocument, classify};
use crate::keyset::{
    KeySetAction, KeySetEvent, KeySetFetchState, KeySetStatus, fold_key_set_status,
    has_key_set_uri,
};
use crate::retrieval::{RetrievalSuccess, WellKnownPath};
use crate::validate::{FieldValidation, validate_capabilities, validate_endpoints, validate_required};
use std::collections::HashMap;
use tracing::debug;

/// Monotonically increasing token identifying one issued fetch.
///
/// A response is applied only if its token is the latest issued, so a late
/// stale response can never overwrite a newer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// State for one discovery pipeline instance (one canonical path).
///
/// There is no multi-document or multi-session state; loading a document
/// discards everything derived from the previous one.
#[derive(Debug)]
pub struct InspectorSession {
    well_known: WellKnownPath,
    document: Option<RetrievalSuccess>,
    key_set: KeySetFetchState,
    latest_token: u64,
}

impl InspectorSession {
    /// Create an empty session for the given canonical path.
    pub fn new(well_known: WellKnownPath) -> Self {
        Self {
            well_known,
            document: None,
            key_set: KeySetFetchState::Idle,
            latest_token: 0,
        }
    }

    /// The canonical path this session inspects.
    pub fn well_known(&self) -> WellKnownPath {
        self.well_known
    }

    /// Issue a token for a fetch about to start. Invalidates all earlier
    /// tokens.
    pub fn issue_request_token(&mut self) -> RequestToken {
        self.latest_token += 1;
        RequestToken(self.latest_token)
    }

    /// Apply a completed document fetch, unless a newer fetch was issued in
    /// the meantime. Returns the key-set action to carry out, if any; `None`
    /// also signals a discarded stale response when the load was rejected.
    pub fn accept_document(
        &mut self,
        token: RequestToken,
        success: RetrievalSuccess,
    ) -> Option<KeySetAction> {
        if token.0 != self.latest_token {
            debug!(
                "Discarding stale response (token {} < {})",
                token.0, self.latest_token
            );
            return None;
        }
        self.load_document(success)
    }

    /// Load a document directly (the pasted-input path needs no token).
    /// Returns the key-set action to carry out, if any.
    pub fn load_document(&mut self, success: RetrievalSuccess) -> Option<KeySetAction> {
        let event = KeySetEvent::DocumentLoaded {
            has_key_set_uri: has_key_set_uri(&success.document),
        };
        self.document = Some(success);

        let (next, action) = crate::keyset::transition(&self.key_set, &event);
        self.key_set = next;
        action
    }

    /// Discard the loaded document and all derived state.
    pub fn clear(&mut self) {
        self.document = None;
        self.key_set = KeySetFetchState::Idle;
    }

    /// The user navigated to the key-set view. Returns a fetch action only
    /// when the guard conditions are freshly satisfied.
    pub fn open_key_set_view(&mut self) -> Option<KeySetAction> {
        let has_uri = self
            .document
            .as_ref()
            .is_some_and(|d| has_key_set_uri(&d.document));
        if !has_uri {
            return None;
        }

        let (next, action) =
            crate::keyset::transition(&self.key_set, &KeySetEvent::KeySetViewOpened);
        self.key_set = next;
        action
    }

    /// Record the outcome of the key-set fetch.
    pub fn complete_key_set_fetch(&mut self, status: KeySetStatus) {
        let (next, _) = crate::keyset::transition(
            &self.key_set,
            &KeySetEvent::FetchCompleted(status),
        );
        self.key_set = next;
    }

    /// The loaded document, if any.
    pub fn document(&self) -> Option<&RetrievalSuccess> {
        self.document.as_ref()
    }

    /// The key-set URI of the loaded document, if present and usable.
    pub fn key_set_uri(&self) -> Option<&str> {
        self.document.as_ref()?.document.get_str("jwks_uri")
    }

    /// Current key-set status (pending until a fetch completes).
    pub fn key_set_status(&self) -> KeySetStatus {
        self.key_set.status()
    }

    /// Classify the loaded document. Computed fresh on every call.
    pub fn classified(&self) -> Option<ClassifiedDocument> {
        self.document.as_ref().map(|d| classify(&d.document))
    }

    /// Required keys the loaded document is missing.
    pub fn required_missing(&self) -> Option<Vec<&'static str>> {
        self.document.as_ref().map(|d| validate_required(&d.document))
    }

    /// Endpoint validations with the key-set outcome folded into `jwks_uri`.
    pub fn endpoint_validations(&self) -> Option<HashMap<&'static str, FieldValidation>> {
        let document = self.document.as_ref()?;
        let mut endpoints = validate_endpoints(&document.document);
        fold_key_set_status(&mut endpoints, &self.key_set.status());
        Some(endpoints)
    }

    /// Capability validations for the loaded document.
    pub fn capability_validations(&self) -> Option<HashMap<&'static str, FieldValidation>> {
        self.document
            .as_ref()
            .map(|d| validate_capabilities(&d.document))
    }
}
