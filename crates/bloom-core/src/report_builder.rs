//! Report builder: turns a JSON feedback payload into a topic summary, a trend report
//! and a SMART action plan with three sequential completion calls.

use crate::error::ReportError;
use crate::llm::CompletionModel;
use serde::{Deserialize, Serialize};

pub const SUMMARY_MAX_TOKENS: u32 = 200;
pub const REPORT_MAX_TOKENS: u32 = 300;
pub const ACTION_PLAN_MAX_TOKENS: u32 = 300;

/// Model-written report. `action_plan` is free text, not a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub summary: String,
    pub report: String,
    pub action_plan: String,
}

pub fn summary_prompt(feedback: &str) -> String {
    format!(
        "What are the main topics discussed in the following feedback?\nFeedback:\n{}\nProvide a concise overview.",
        feedback
    )
}

pub fn report_prompt(feedback: &str) -> String {
    format!(
        "Generate a short report based on the following feedback:\n{}\nHighlight key trends, common issues, and positive aspects mentioned in the feedback.",
        feedback
    )
}

pub fn action_plan_prompt(feedback: &str) -> String {
    format!(
        "Based on the following feedback, suggest a prioritized action plan to address the issues raised:\n{}\nIdentify specific, measurable, achievable, relevant, and time-bound (SMART) actions where possible.",
        feedback
    )
}

/// Parses `feedback_json`, pretty-prints it into the three prompts and asks `model` for each
/// in turn (summary, report, action plan). The first failing call aborts the rest.
pub async fn generate_action_report(
    feedback_json: &str,
    model: &dyn CompletionModel,
) -> Result<ActionReport, ReportError> {
    let data: serde_json::Value = serde_json::from_str(feedback_json).map_err(ReportError::Decode)?;
    let readable = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());

    let summary = complete_text(model, "summary", &summary_prompt(&readable), SUMMARY_MAX_TOKENS).await?;
    let report = complete_text(model, "report", &report_prompt(&readable), REPORT_MAX_TOKENS).await?;
    let action_plan = complete_text(
        model,
        "action plan",
        &action_plan_prompt(&readable),
        ACTION_PLAN_MAX_TOKENS,
    )
    .await?;

    tracing::info!("[REPORT] action report generated ({} bytes of feedback)", readable.len());

    Ok(ActionReport {
        summary,
        report,
        action_plan,
    })
}

async fn complete_text(
    model: &dyn CompletionModel,
    stage: &'static str,
    prompt: &str,
    max_tokens: u32,
) -> Result<String, ReportError> {
    tracing::debug!("[REPORT] requesting {} (max_tokens: {})", stage, max_tokens);
    let completion = model.complete(prompt, max_tokens).await?;
    completion
        .first_text()
        .map(|t| t.trim().to_string())
        .ok_or(ReportError::EmptyCompletion(stage))
}
