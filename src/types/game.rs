//! Sequence game data

use serde::{Deserialize, Serialize};
use crate::types::{FeedbackSequence, ReasonCode};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Between turns; the next tick starts presenting
    Idle,
    /// Replaying the current prefix
    Showing,
    /// Collecting the player's answer
    AwaitingInput,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::Idle => "IDLE",
            GameMode::Showing => "SHOWING",
            GameMode::AwaitingInput => "AWAITING_INPUT",
        };
        write!(f, "{}", name)
    }
}

/// A pressed button, as seen on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEvent {
    /// Channel index, 0-based
    pub button: usize,
}

impl ButtonEvent {
    pub fn new(button: usize) -> Self {
        Self { button }
    }

    /// 1-based note number played by this button
    pub fn note(&self) -> u8 {
        (self.button + 1) as u8
    }
}

/// Read-only view of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub level: usize,
    pub step: usize,
    pub mode: GameMode,
}

/// What a game tick or input did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    None,
    TurnStarted { level: usize },
    NotePresented { step: usize, note: u8 },
    AwaitingInput,
    Correct { step: usize },
    LevelComplete { level: usize },
    Failed,
    Won,
    InputIgnored,
}

/// Result of driving the game once
#[derive(Debug, Clone, PartialEq)]
pub struct GameUpdate {
    pub event: GameEvent,
    pub reason: ReasonCode,
    /// Burst to schedule, if the transition has audible/visible feedback
    pub feedback: Option<FeedbackSequence>,
}

impl GameUpdate {
    pub fn new(event: GameEvent, reason: ReasonCode) -> Self {
        Self { event, reason, feedback: None }
    }

    pub fn with_feedback(mut self, feedback: FeedbackSequence) -> Self {
        self.feedback = Some(feedback);
        self
    }
}
