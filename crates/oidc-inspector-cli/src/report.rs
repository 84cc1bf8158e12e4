//! Report assembly and rendering
//!
//! Pulls the session's derived views into one report struct, serializable for
//! `--format json` and renderable with status badges for humans.

use oidc_inspector::{
    ClassifiedDocument, DisplayField, FieldStatus, FieldValidation, InspectorSession,
    KeySetStatus, RetrievalError, RetrievalErrorKind,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Write;

/// Everything one inspection produced.
#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub endpoints: Vec<FieldReport>,
    pub capabilities: Vec<FieldReport>,
    pub other: Vec<DisplayField>,
    pub required_missing: Vec<String>,
    pub key_set: KeySetReport,
}

/// A classified field joined with its validation outcome, when one exists.
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub validation: FieldValidation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum KeySetReport {
    Pending,
    Pass { key_count: usize },
    Error { message: String },
}

impl InspectionReport {
    /// Assemble the report from a session with a loaded document.
    ///
    /// # Panics
    ///
    /// Panics if no document is loaded; callers load one first.
    pub fn from_session(session: &InspectorSession) -> Self {
        let groups: ClassifiedDocument = session.classified().expect("document loaded");
        let mut endpoint_validations = session.endpoint_validations().expect("document loaded");
        let mut capability_validations =
            session.capability_validations().expect("document loaded");

        // Validation maps cover the full fixed key lists; classified groups
        // only carry keys with displayable values. The report walks the
        // validation lists so Missing entries still show up.
        let endpoints = oidc_inspector::ENDPOINT_KEYS
            .iter()
            .map(|&key| FieldReport {
                key: key.to_string(),
                label: oidc_inspector::field_label(key),
                value: groups
                    .endpoints
                    .iter()
                    .find(|f| f.key == key)
                    .map(|f| f.value.clone()),
                validation: endpoint_validations.remove(key).expect("full key list"),
            })
            .collect();

        let capabilities = oidc_inspector::CAPABILITY_KEYS
            .iter()
            .map(|&key| FieldReport {
                key: key.to_string(),
                label: oidc_inspector::field_label(key),
                value: groups
                    .capabilities
                    .iter()
                    .find(|f| f.key == key)
                    .map(|f| f.value.clone()),
                validation: capability_validations.remove(key).expect("full key list"),
            })
            .collect();

        let key_set = match session.key_set_status() {
            KeySetStatus::Pending => KeySetReport::Pending,
            KeySetStatus::Pass { key_count } => KeySetReport::Pass { key_count },
            KeySetStatus::Error { message } => KeySetReport::Error { message },
        };

        Self {
            endpoints,
            capabilities,
            other: groups.other,
            required_missing: session
                .required_missing()
                .expect("document loaded")
                .into_iter()
                .map(str::to_string)
                .collect(),
            key_set,
        }
    }

    /// Render the human-readable report.
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        if self.required_missing.is_empty() {
            writeln!(out, "{} all required fields present", badge(FieldStatus::Pass))?;
        } else {
            writeln!(
                out,
                "{} missing required fields: {}",
                badge(FieldStatus::Error),
                self.required_missing.join(", ")
            )?;
        }

        writeln!(out, "\n{}", "Endpoints".bold())?;
        for field in &self.endpoints {
            render_field(out, field)?;
        }

        writeln!(out, "\n{}", "Capabilities".bold())?;
        for field in &self.capabilities {
            render_field(out, field)?;
        }

        if !self.other.is_empty() {
            writeln!(out, "\n{}", "Other fields".bold())?;
            for field in &self.other {
                writeln!(out, "  {}: {}", field.label, field.value)?;
            }
        }

        Ok(())
    }
}

fn render_field(out: &mut impl Write, field: &FieldReport) -> std::io::Result<()> {
    write!(out, "  {} {}", badge(field.validation.status), field.label)?;
    if let Some(message) = &field.validation.message {
        write!(out, " - {message}")?;
    }
    if let Some(value) = &field.value {
        write!(out, "\n      {}", value.dimmed())?;
    }
    writeln!(out)
}

fn badge(status: FieldStatus) -> String {
    match status {
        FieldStatus::Pass => "PASS".green().to_string(),
        FieldStatus::Error => "FAIL".red().to_string(),
        FieldStatus::Pending => "WAIT".yellow().to_string(),
    }
}

/// Render a retrieval failure with taxonomy-specific remediation text.
pub fn render_error(err: &RetrievalError) -> String {
    let headline = format!("{} {err}", "error:".red().bold());
    match err.kind() {
        RetrievalErrorKind::Blocked => {
            format!("{headline}\n{}", err.detail().unwrap_or_default())
        }
        RetrievalErrorKind::Http | RetrievalErrorKind::JsonParse => match err.detail() {
            Some(detail) if !detail.is_empty() => {
                format!("{headline}\nresponse body (truncated):\n{detail}")
            }
            _ => headline,
        },
        RetrievalErrorKind::EmptyInput => {
            format!("{headline}\nprovide an issuer URL, e.g. https://accounts.google.com")
        }
        _ => headline,
    }
}
