//! Feedback bursts: timed lists of light, tone and display actions

use serde::{Deserialize, Serialize};
use crate::types::Rgb;

/// Display regions driven by the two distance sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Breathing effect, gated by sensor A
    A,
    /// Static rainbow, gated by sensor B
    B,
}

/// A single output command for the feedback hardware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackAction {
    /// Set one channel light on or off
    Light { channel: usize, on: bool },
    /// Set every channel light
    AllLights { on: bool },
    /// Start a tone; the hardware stops it after `duration_ms`
    Tone { frequency_hz: u32, duration_ms: u64 },
    /// Silence the speaker
    ToneOff,
    /// Paint a whole region with one colour
    Fill { region: Region, color: Rgb },
    /// Paint a region pixel by pixel
    Pixels { region: Region, colors: Vec<Rgb> },
    /// Turn a region off
    Clear { region: Region },
}

/// One step of a burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackStep {
    /// Fire immediately
    Do(FeedbackAction),
    /// Hold for the given time before the next step
    Wait(u64),
}

/// What a burst is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackKind {
    Startup,
    Note,
    LevelPause,
    Fail,
    Win,
}

/// An uninterruptible burst of feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSequence {
    pub kind: FeedbackKind,
    pub steps: Vec<FeedbackStep>,
}

impl FeedbackSequence {
    pub fn new(kind: FeedbackKind) -> Self {
        Self { kind, steps: Vec::new() }
    }

    /// Append an action
    pub fn then(mut self, action: FeedbackAction) -> Self {
        self.steps.push(FeedbackStep::Do(action));
        self
    }

    /// Append a hold
    pub fn wait(mut self, ms: u64) -> Self {
        self.steps.push(FeedbackStep::Wait(ms));
        self
    }

    /// Total time the burst occupies
    pub fn duration_ms(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| match s {
                FeedbackStep::Wait(ms) => *ms,
                FeedbackStep::Do(_) => 0,
            })
            .sum()
    }

    /// Actions in order, ignoring timing
    pub fn actions(&self) -> impl Iterator<Item = &FeedbackAction> {
        self.steps.iter().filter_map(|s| match s {
            FeedbackStep::Do(a) => Some(a),
            FeedbackStep::Wait(_) => None,
        })
    }
}
