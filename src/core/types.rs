//! Shared types used across modules
//!
//! Contains step outcomes, the run summary, and the push template enum.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// PushPlus message template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushTemplate {
    #[default]
    #[serde(rename = "txt", alias = "plain")]
    Plain,
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "json", alias = "structured")]
    Structured,
}

impl PushTemplate {
    /// Wire name expected by PushPlus
    pub fn as_str(&self) -> &'static str {
        match self {
            PushTemplate::Plain => "txt",
            PushTemplate::Markdown => "markdown",
            PushTemplate::Html => "html",
            PushTemplate::Structured => "json",
        }
    }
}

impl std::fmt::Display for PushTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PushTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "plain" => Ok(PushTemplate::Plain),
            "markdown" => Ok(PushTemplate::Markdown),
            "html" => Ok(PushTemplate::Html),
            "json" | "structured" => Ok(PushTemplate::Structured),
            other => Err(format!("unknown template '{}'", other)),
        }
    }
}

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The action was performed
    Completed,
    /// No actionable control; most likely done earlier in this period
    AlreadyDone,
    /// No attempts left
    NotAvailable,
    /// A bounded wait expired; read as "probably already done"
    TimedOut,
    /// Unexpected automation error
    Failed,
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Completed)
    }

    /// Soft failures are business outcomes rather than defects
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            StepStatus::AlreadyDone | StepStatus::NotAvailable | StepStatus::TimedOut
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::AlreadyDone => write!(f, "already_done"),
            StepStatus::NotAvailable => write!(f, "not_available"),
            StepStatus::TimedOut => write!(f, "timed_out"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one step, resolved once and then folded into the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub status: StepStatus,
    /// User-facing detail; the prize text for a completed draw
    pub detail: String,
}

impl StepOutcome {
    pub fn new(status: StepStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn completed(detail: impl Into<String>) -> Self {
        Self::new(StepStatus::Completed, detail)
    }

    pub fn already_done(detail: impl Into<String>) -> Self {
        Self::new(StepStatus::AlreadyDone, detail)
    }

    pub fn not_available(detail: impl Into<String>) -> Self {
        Self::new(StepStatus::NotAvailable, detail)
    }

    pub fn timed_out(detail: impl Into<String>) -> Self {
        Self::new(StepStatus::TimedOut, detail)
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self::new(StepStatus::Failed, detail)
    }

    pub fn success(&self) -> bool {
        self.status.is_success()
    }
}

/// Check-in part of the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInSummary {
    pub success: bool,
    pub message: String,
    pub status: StepStatus,
}

/// Lottery part of the run summary; `prize` holds the reason on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotterySummary {
    pub success: bool,
    pub prize: String,
    pub status: StepStatus,
}

/// Aggregate record of one execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub sign_in: SignInSummary,
    pub lottery: LotterySummary,
    /// Elapsed whole seconds, e.g. `42秒`
    pub duration: String,
    pub duration_secs: u64,
}

impl From<StepOutcome> for SignInSummary {
    fn from(outcome: StepOutcome) -> Self {
        Self {
            success: outcome.success(),
            message: outcome.detail,
            status: outcome.status,
        }
    }
}

impl From<StepOutcome> for LotterySummary {
    fn from(outcome: StepOutcome) -> Self {
        Self {
            success: outcome.success(),
            prize: outcome.detail,
            status: outcome.status,
        }
    }
}

impl RunSummary {
    pub fn new(sign_in: StepOutcome, lottery: StepOutcome, duration_secs: u64) -> Self {
        Self {
            sign_in: sign_in.into(),
            lottery: lottery.into(),
            duration: format_duration(duration_secs),
            duration_secs,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.sign_in.success && self.lottery.success
    }
}

/// Render elapsed seconds the way reports show them
pub fn format_duration(secs: u64) -> String {
    format!("{}秒", secs)
}
