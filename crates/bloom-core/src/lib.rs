//! Bloom — Core library.
//! Patient-feedback classification and LLM report generation shared by the gateway.

pub mod classifier;
pub mod config;
pub mod error;
pub mod llm;
pub mod report_builder;

pub use classifier::{analyze_feedback, process_batch, Analysis, FeedbackResult, Rule, RuleTable};
pub use config::{GatewayConfig, LlmMode};
pub use error::{ClassifierError, LlmError, ReportError};
pub use llm::{model_from_config, Completion, CompletionChoice, CompletionClient, CompletionModel, MockCompletionModel};
pub use report_builder::{generate_action_report, ActionReport};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
