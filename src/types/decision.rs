//! Slideshow decisions

use serde::{Deserialize, Serialize};

/// Outcome of ingesting one telemetry line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Begin the slideshow
    Start,
    /// Halt the slideshow, keep the last image
    Stop,
    /// Nothing to do
    NoChange,
}

impl Decision {
    /// Get terminal colour for display
    pub fn color(&self) -> colored::Color {
        match self {
            Decision::Start => colored::Color::Green,
            Decision::Stop => colored::Color::Red,
            Decision::NoChange => colored::Color::BrightBlack,
        }
    }

    pub fn is_transition(&self) -> bool {
        !matches!(self, Decision::NoChange)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Decision::Start => "START",
            Decision::Stop => "STOP",
            Decision::NoChange => "NO_CHANGE",
        };
        write!(f, "{}", name)
    }
}
