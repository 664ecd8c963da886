//! Reason codes for conditioner decisions and game transitions

use serde::{Deserialize, Serialize};

/// Reason codes for every decision the state machines make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R001: Input
    // =========================================================================
    /// Line carried no recognisable labelled value
    R001_LINE_DROPPED,
    /// Labelled field present but holds the no-echo placeholder
    R001_NO_ECHO,

    // =========================================================================
    // R002: Held state
    // =========================================================================
    /// Session running, nothing changes
    R002_STATE_ACTIVE,
    /// Session idle, nothing changes
    R002_STATE_INACTIVE,

    // =========================================================================
    // R003: Debounce
    // =========================================================================
    /// Below start threshold, waiting out the start debounce
    R003_START_DEBOUNCE_ACCUMULATING,
    /// Above stop threshold, waiting out the stop debounce
    R003_STOP_DEBOUNCE_ACCUMULATING,

    // =========================================================================
    // R004: Thresholds
    // =========================================================================
    /// Smoothed value between the thresholds, timers cleared
    R004_DEAD_ZONE,

    // =========================================================================
    // R005: Transitions
    // =========================================================================
    /// Emitting Start
    R005_TRANSITION_TO_START,
    /// Emitting Stop
    R005_TRANSITION_TO_STOP,

    // =========================================================================
    // R006: Game presentation
    // =========================================================================
    /// Nothing due this tick
    R006_GAME_WAITING,
    /// New turn, replaying the prefix from the start
    R006_TURN_STARTED,
    /// One note of the prefix presented
    R006_NOTE_PRESENTED,
    /// Prefix finished, player's turn
    R006_AWAITING_INPUT,

    // =========================================================================
    // R007: Game input
    // =========================================================================
    /// Pressed button matched the expected note
    R007_INPUT_CORRECT,
    /// Whole prefix entered, level increases
    R007_LEVEL_COMPLETE,
    /// Wrong button, game resets
    R007_INPUT_WRONG,
    /// Button pressed outside the input phase
    R007_INPUT_IGNORED,

    // =========================================================================
    // R008: Game end
    // =========================================================================
    /// Full sequence reproduced, game re-arms
    R008_GAME_WON,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R001_LINE_DROPPED => "R001_LINE_DROPPED",
            Self::R001_NO_ECHO => "R001_NO_ECHO",
            Self::R002_STATE_ACTIVE => "R002_STATE_ACTIVE",
            Self::R002_STATE_INACTIVE => "R002_STATE_INACTIVE",
            Self::R003_START_DEBOUNCE_ACCUMULATING => "R003_START_DEBOUNCE_ACCUMULATING",
            Self::R003_STOP_DEBOUNCE_ACCUMULATING => "R003_STOP_DEBOUNCE_ACCUMULATING",
            Self::R004_DEAD_ZONE => "R004_DEAD_ZONE",
            Self::R005_TRANSITION_TO_START => "R005_TRANSITION_TO_START",
            Self::R005_TRANSITION_TO_STOP => "R005_TRANSITION_TO_STOP",
            Self::R006_GAME_WAITING => "R006_GAME_WAITING",
            Self::R006_TURN_STARTED => "R006_TURN_STARTED",
            Self::R006_NOTE_PRESENTED => "R006_NOTE_PRESENTED",
            Self::R006_AWAITING_INPUT => "R006_AWAITING_INPUT",
            Self::R007_INPUT_CORRECT => "R007_INPUT_CORRECT",
            Self::R007_LEVEL_COMPLETE => "R007_LEVEL_COMPLETE",
            Self::R007_INPUT_WRONG => "R007_INPUT_WRONG",
            Self::R007_INPUT_IGNORED => "R007_INPUT_IGNORED",
            Self::R008_GAME_WON => "R008_GAME_WON",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R001_LINE_DROPPED => "No labelled value in line",
            Self::R001_NO_ECHO => "Sensor reported no echo",
            Self::R002_STATE_ACTIVE => "Slideshow running",
            Self::R002_STATE_INACTIVE => "Slideshow idle",
            Self::R003_START_DEBOUNCE_ACCUMULATING => "Presence held, waiting to start",
            Self::R003_STOP_DEBOUNCE_ACCUMULATING => "Absence held, waiting to stop",
            Self::R004_DEAD_ZONE => "Between thresholds",
            Self::R005_TRANSITION_TO_START => "Starting slideshow",
            Self::R005_TRANSITION_TO_STOP => "Stopping slideshow",
            Self::R006_GAME_WAITING => "Waiting for next step",
            Self::R006_TURN_STARTED => "Turn started",
            Self::R006_NOTE_PRESENTED => "Note presented",
            Self::R006_AWAITING_INPUT => "Your turn",
            Self::R007_INPUT_CORRECT => "Correct",
            Self::R007_LEVEL_COMPLETE => "Next level",
            Self::R007_INPUT_WRONG => "Wrong, restarting",
            Self::R007_INPUT_IGNORED => "Input outside answer phase",
            Self::R008_GAME_WON => "Sequence complete",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
