//! Feedback classifier: ordered keyword rules mapped to fixed summary/report/action-plan outcomes.
//! First matching rule wins; text that matches nothing gets the table's fallback.

use crate::error::ClassifierError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const CONCERNS_SUMMARY: &str = "Patient reported good care during surgery but had concerns about nurse availability, food quality, and cleanliness.";
const CONCERNS_REPORT: &str = "Key issues include: 1) Unresponsive night staff; 2) Repetitive, cold food; 3) Poor bathroom hygiene. Positive feedback was given to the surgery and physiotherapy departments.";
const CONCERNS_ACTIONS: &[&str] = &[
    "Assign additional nursing staff during night shifts.",
    "Revise the food menu and monitor meal temperature.",
    "Increase housekeeping frequency and implement a daily sanitation checklist.",
];

const SATISFACTION_SUMMARY: &str = "No major concerns were reported by the patient.";
const SATISFACTION_REPORT: &str = "The feedback suggests overall satisfaction with services provided.";
const SATISFACTION_ACTIONS: &[&str] = &["Continue maintaining current standards and monitor regularly."];

/// Keywords that flag a care-quality concern.
const CONCERN_KEYWORDS: &[&str] = &["nurse", "food"];

static DEFAULT_RULES: Lazy<RuleTable> = Lazy::new(RuleTable::default);

/// Summary, report and action plan for one piece of feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub report: String,
    pub action_plan: Vec<String>,
}

impl Analysis {
    pub fn new(summary: &str, report: &str, action_plan: &[&str]) -> Self {
        Self {
            summary: summary.to_string(),
            report: report.to_string(),
            action_plan: action_plan.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Night staffing, food quality and sanitation concerns.
    pub fn concerns() -> Self {
        Self::new(CONCERNS_SUMMARY, CONCERNS_REPORT, CONCERNS_ACTIONS)
    }

    /// Overall satisfaction; keep current standards.
    pub fn satisfaction() -> Self {
        Self::new(SATISFACTION_SUMMARY, SATISFACTION_REPORT, SATISFACTION_ACTIONS)
    }
}

/// One classified feedback entry as returned by `/process_feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub original_text: String,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Case-insensitive keyword rule. Matches when any keyword occurs anywhere in the text.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    keywords: Vec<String>,
    outcome: Analysis,
}

impl Rule {
    /// Fails if `outcome` has no action items.
    pub fn new(name: &str, keywords: &[&str], outcome: Analysis) -> Result<Self, ClassifierError> {
        require_action_plan(name, &outcome)?;
        Ok(Self::from_parts(name, keywords, outcome))
    }

    fn from_parts(name: &str, keywords: &[&str], outcome: Analysis) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            outcome,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `lower` must already be lowercased.
    fn matches_lower(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matches_lower(&text.to_lowercase())
    }
}

/// Ordered rules plus a fallback outcome.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    fallback: Analysis,
}

impl RuleTable {
    /// Fails if `fallback` has no action items.
    pub fn new(fallback: Analysis) -> Result<Self, ClassifierError> {
        require_action_plan("fallback", &fallback)?;
        Ok(Self {
            rules: Vec::new(),
            fallback,
        })
    }

    /// Appends a rule; it is evaluated after every rule already in the table.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> &Analysis {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches_lower(&lower))
            .map(|r| &r.outcome)
            .unwrap_or(&self.fallback)
    }

    /// One result per input, in input order.
    pub fn process_batch(&self, feedbacks: &[String]) -> Vec<FeedbackResult> {
        feedbacks
            .iter()
            .map(|text| FeedbackResult {
                original_text: text.clone(),
                analysis: self.classify(text).clone(),
            })
            .collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![Rule::from_parts("concerns", CONCERN_KEYWORDS, Analysis::concerns())],
            fallback: Analysis::satisfaction(),
        }
    }
}

fn require_action_plan(name: &str, outcome: &Analysis) -> Result<(), ClassifierError> {
    if outcome.action_plan.is_empty() {
        return Err(ClassifierError::EmptyActionPlan(name.to_string()));
    }
    Ok(())
}

/// Classifies one piece of feedback with the default rules.
pub fn analyze_feedback(text: &str) -> Analysis {
    DEFAULT_RULES.classify(text).clone()
}

/// Classifies a batch with the default rules.
pub fn process_batch(feedbacks: &[String]) -> Vec<FeedbackResult> {
    DEFAULT_RULES.process_batch(feedbacks)
}
