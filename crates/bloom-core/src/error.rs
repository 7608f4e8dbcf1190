//! Error types for completion calls and report generation.

use thiserror::Error;

/// Failures talking to the completion endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("completion request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API {0}: {1}")]
    Api(u16, String),

    #[error("completion response parse: {0}")]
    Parse(String),
}

/// Rejected rule-table construction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassifierError {
    /// Every outcome must recommend at least one action; carries the rule name.
    #[error("rule '{0}' has an empty action plan")]
    EmptyActionPlan(String),
}

/// Failures of [`crate::generate_action_report`].
#[derive(Error, Debug)]
pub enum ReportError {
    /// The feedback payload was not valid JSON.
    #[error("Error decoding JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    /// The model answered without any choices; carries the prompt stage.
    #[error("model returned no choices for the {0} prompt")]
    EmptyCompletion(&'static str),
}

impl ReportError {
    /// True when the caller sent bad input rather than the model failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReportError::Decode(_))
    }
}
