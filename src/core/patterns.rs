//! Fixed feedback bursts for the game and the startup melody

use crate::config::DeviceConfig;
use crate::types::{FeedbackAction, FeedbackKind, FeedbackSequence};
use crate::{NOTE_C, NOTE_E, NOTE_G};

/// Builds the device's feedback bursts from its note table
#[derive(Debug, Clone)]
pub struct FeedbackPatterns {
    notes: Vec<u32>,
    note_ms: u64,
    level_pause_ms: u64,
}

impl Default for FeedbackPatterns {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}

impl FeedbackPatterns {
    /// Patterns with the configured tone table and timings
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            notes: config.notes.clone(),
            note_ms: config.note_duration_ms,
            level_pause_ms: config.level_pause_ms,
        }
    }

    /// Frequency for a 1-based note number
    pub fn frequency(&self, note: u8) -> Option<u32> {
        (note as usize).checked_sub(1).and_then(|i| self.notes.get(i).copied())
    }

    /// Light and sound one note of the sequence
    ///
    /// Unknown note numbers produce an empty burst.
    pub fn note(&self, note: u8) -> FeedbackSequence {
        let seq = FeedbackSequence::new(FeedbackKind::Note);
        let Some(freq) = self.frequency(note) else {
            return seq;
        };
        let channel = note as usize - 1;
        seq.then(FeedbackAction::Light { channel, on: true })
            .then(FeedbackAction::Tone { frequency_hz: freq, duration_ms: self.note_ms })
            .wait(self.note_ms)
            .then(FeedbackAction::Light { channel, on: false })
            .then(FeedbackAction::ToneOff)
    }

    /// Pause after a completed level
    pub fn level_pause(&self) -> FeedbackSequence {
        FeedbackSequence::new(FeedbackKind::LevelPause).wait(self.level_pause_ms)
    }

    /// Three all-on / all-off flashes alternating C and G, then a pause
    pub fn fail(&self) -> FeedbackSequence {
        let mut seq = FeedbackSequence::new(FeedbackKind::Fail);
        for _ in 0..3 {
            seq = seq
                .then(FeedbackAction::AllLights { on: true })
                .then(FeedbackAction::Tone { frequency_hz: NOTE_C, duration_ms: 300 })
                .wait(400)
                .then(FeedbackAction::AllLights { on: false })
                .then(FeedbackAction::Tone { frequency_hz: NOTE_G, duration_ms: 300 })
                .wait(400);
        }
        seq.then(FeedbackAction::ToneOff).wait(1000)
    }

    /// All lights on over an E-G-E-C fanfare, then a long pause
    pub fn win(&self) -> FeedbackSequence {
        let fanfare = [(NOTE_E, 400, 500), (NOTE_G, 400, 500), (NOTE_E, 400, 500), (NOTE_C, 600, 700)];
        let mut seq = FeedbackSequence::new(FeedbackKind::Win).then(FeedbackAction::AllLights { on: true });
        for (freq, tone_ms, hold_ms) in fanfare {
            seq = seq
                .then(FeedbackAction::Tone { frequency_hz: freq, duration_ms: tone_ms })
                .wait(hold_ms);
        }
        seq.then(FeedbackAction::ToneOff)
            .then(FeedbackAction::AllLights { on: false })
            .wait(2000)
    }

    /// Whole melody once at boot
    pub fn startup(&self, melody: &[u8]) -> FeedbackSequence {
        let mut seq = FeedbackSequence::new(FeedbackKind::Startup);
        for &note in melody {
            let Some(freq) = self.frequency(note) else {
                continue;
            };
            let channel = note as usize - 1;
            seq = seq
                .then(FeedbackAction::Light { channel, on: true })
                .then(FeedbackAction::Tone { frequency_hz: freq, duration_ms: 300 })
                .wait(350)
                .then(FeedbackAction::Light { channel, on: false })
                .wait(50);
        }
        seq.wait(500)
    }
}

// =============================================================================
// TESTS
// =============================================================================
