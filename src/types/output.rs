//! Output structures for terminal display

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use colored::Colorize;
use crate::types::{Decision, ReasonCode};

/// Output structure for each ingested line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionerOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Parsed value, if the line carried one
    pub raw: Option<f64>,
    /// Current moving average
    pub smoothed: Option<f64>,
    /// What to do with the slideshow
    pub decision: Decision,
    /// Session state after this line
    pub active: bool,
    /// Why
    pub reason: ReasonCode,
}

impl ConditionerOutput {
    /// Create new output
    pub fn new(
        raw: Option<f64>,
        smoothed: Option<f64>,
        decision: Decision,
        active: bool,
        reason: ReasonCode,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            raw,
            smoothed,
            decision,
            active,
            reason,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "raw={} | avg={} | {} | active={} | {}",
            fmt_cm(self.raw),
            fmt_cm(self.smoothed),
            self.decision,
            self.active,
            self.reason.code()
        );
        if self.decision.is_transition() {
            line.color(self.decision.color()).bold().to_string()
        } else {
            line.color(self.decision.color()).to_string()
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "raw={} | avg={} | decision={} | active={} | reason={}",
            fmt_cm(self.raw),
            fmt_cm(self.smoothed),
            self.decision,
            self.active,
            self.reason.code()
        )
    }
}

fn fmt_cm(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}
