//! Runtime configuration
//!
//! Defaults mirror the constants in the crate root. A JSON file may override
//! any subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::{
    BREATH_INTERVAL_MS, BREATH_PULSE_SPEED, BUTTON_TONE_MS, DEFAULT_FIELD_LABEL, LEVEL_PAUSE_MS,
    MELODY, NOTE_DURATION_MS, NOTE_TABLE, PRESENCE_THRESHOLD_CM, REGION_PIXELS, SLIDE_INTERVAL_MS,
    SMOOTHING_WINDOW, START_DEBOUNCE_MS, START_THRESHOLD_CM, STEP_DELAY_MS, STOP_DEBOUNCE_MS,
    STOP_THRESHOLD_CM, TELEMETRY_INTERVAL_MS,
};

/// How a held button is reported to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Every tick the button is held counts as a press
    #[default]
    Level,
    /// Only the released → pressed transition counts
    Edge,
}

/// What happens to the breathing phase when presence is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseResetPolicy {
    /// Keep the accumulated phase and resume from it
    #[default]
    Hold,
    /// Restart the waveform from zero
    Reset,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub conditioner: ConditionerConfig,
    pub slideshow: SlideshowConfig,
}

/// On-device loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub presence_threshold_cm: f64,
    pub breath_interval_ms: u64,
    pub pulse_speed: f64,
    pub phase_policy: PhaseResetPolicy,
    pub region_pixels: usize,
    /// Frequency per button channel (Hz)
    pub notes: Vec<u32>,
    /// Game melody, 1-based note numbers
    pub melody: Vec<u8>,
    pub step_delay_ms: u64,
    pub note_duration_ms: u64,
    pub button_tone_ms: u64,
    pub level_pause_ms: u64,
    pub trigger: TriggerMode,
    pub telemetry_interval_ms: u64,
    pub startup_melody: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            presence_threshold_cm: PRESENCE_THRESHOLD_CM,
            breath_interval_ms: BREATH_INTERVAL_MS,
            pulse_speed: BREATH_PULSE_SPEED,
            phase_policy: PhaseResetPolicy::Hold,
            region_pixels: REGION_PIXELS,
            notes: NOTE_TABLE.to_vec(),
            melody: MELODY.to_vec(),
            step_delay_ms: STEP_DELAY_MS,
            note_duration_ms: NOTE_DURATION_MS,
            button_tone_ms: BUTTON_TONE_MS,
            level_pause_ms: LEVEL_PAUSE_MS,
            trigger: TriggerMode::Level,
            telemetry_interval_ms: TELEMETRY_INTERVAL_MS,
            startup_melody: true,
        }
    }
}

/// Companion signal conditioner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// Telemetry field to read, e.g. "B" for `A: 1.0 | B: 2.0`
    pub label: String,
    pub start_threshold_cm: f64,
    pub stop_threshold_cm: f64,
    pub start_debounce_ms: u64,
    pub stop_debounce_ms: u64,
    pub smoothing_window: usize,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_FIELD_LABEL.to_string(),
            start_threshold_cm: START_THRESHOLD_CM,
            stop_threshold_cm: STOP_THRESHOLD_CM,
            start_debounce_ms: START_DEBOUNCE_MS,
            stop_debounce_ms: STOP_DEBOUNCE_MS,
            smoothing_window: SMOOTHING_WINDOW,
        }
    }
}

/// Slideshow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    pub interval_ms: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_ms: SLIDE_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject configurations the state machines cannot run with
    pub fn validate(&self) -> Result<()> {
        let c = &self.conditioner;
        if c.start_threshold_cm >= c.stop_threshold_cm {
            return Err(Error::InvalidConfig(format!(
                "start threshold {} must be below stop threshold {}",
                c.start_threshold_cm, c.stop_threshold_cm
            )));
        }
        if c.smoothing_window == 0 {
            return Err(Error::InvalidConfig("smoothing window must hold at least one sample".into()));
        }
        if c.label.trim().is_empty() {
            return Err(Error::InvalidConfig("field label is empty".into()));
        }

        let d = &self.device;
        if d.notes.is_empty() {
            return Err(Error::InvalidConfig("at least one button channel is required".into()));
        }
        if d.melody.is_empty() {
            return Err(Error::InvalidConfig("melody is empty".into()));
        }
        if let Some(bad) = d.melody.iter().find(|&&n| n == 0 || n as usize > d.notes.len()) {
            return Err(Error::InvalidConfig(format!(
                "melody note {} has no button channel (1..={})",
                bad,
                d.notes.len()
            )));
        }
        if d.breath_interval_ms == 0 || d.telemetry_interval_ms == 0 {
            return Err(Error::InvalidConfig("update intervals must be non-zero".into()));
        }
        if self.slideshow.interval_ms == 0 {
            return Err(Error::InvalidConfig("slide interval must be non-zero".into()));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"conditioner": {"label": "A"}, "device": {"trigger": "edge"}}"#).unwrap();
        assert_eq!(config.conditioner.label, "A");
        assert_eq!(config.conditioner.start_threshold_cm, START_THRESHOLD_CM);
        assert_eq!(config.device.trigger, TriggerMode::Edge);
        assert_eq!(config.device.melody, MELODY.to_vec());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = Config::default();
        config.conditioner.start_threshold_cm = 4.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_melody_note_out_of_range_rejected() {
        let mut config = Config::default();
        config.device.melody = vec![1, 7];
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.conditioner.smoothing_window = 0;
        assert!(config.validate().is_err());
    }
}
