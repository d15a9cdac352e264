use serde::Serialize;

use crate::events::SourceEvent;

/// Outcome of one source attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum SourceOutcome {
    /// Arbitrary JSON payload; `Null` when the source returned nothing.
    Success(serde_json::Value),
    Failure(String),
}

/// One entry per data source attempted during a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceResult {
    pub label: String,
    pub outcome: SourceOutcome,
}

impl SourceResult {
    pub fn success(label: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            label: label.into(),
            outcome: SourceOutcome::Success(payload),
        }
    }

    pub fn failure(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: SourceOutcome::Failure(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            SourceOutcome::Failure(msg) => Some(msg),
            SourceOutcome::Success(_) => None,
        }
    }
}

impl From<SourceEvent> for SourceResult {
    /// A non-empty `error` marks a failure; anything else is a success.
    fn from(event: SourceEvent) -> Self {
        match event.error.filter(|e| !e.is_empty()) {
            Some(message) => Self::failure(event.label, message),
            None => Self::success(event.label, event.data.unwrap_or(serde_json::Value::Null)),
        }
    }
}
