//! Presencebox: sensor conditioning and feedback sequencing for a tangible device
//!
//! Two halves share one design problem, turning jittery distance samples into
//! stable decisions:
//! - on-device loop: presence gate → breathing light, button scan → sequence game
//! - companion: telemetry lines → smoothing + hysteresis → slideshow Start/Stop

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};

// =============================================================================
// PRESENCE GATE [C]
// =============================================================================

/// Distance above which the on-device gate reports presence (cm)
pub const PRESENCE_THRESHOLD_CM: f64 = 3.0;

// =============================================================================
// DISTANCE SAMPLER [C]
// =============================================================================

/// Echo wait before a measurement counts as "no echo" (microseconds)
pub const ECHO_TIMEOUT_US: u32 = 30_000;

/// Speed of sound in cm per microsecond
pub const SOUND_CM_PER_US: f64 = 0.0343;

/// Readings below this floor are clamped to zero (cm)
pub const MIN_PHYSICAL_DISTANCE_CM: f64 = 0.5;

// =============================================================================
// BREATHING EFFECT [C]
// =============================================================================

/// Minimum time between breathing frames (milliseconds)
pub const BREATH_INTERVAL_MS: u64 = 30;

/// Larger value gives a faster pulse
pub const BREATH_PULSE_SPEED: f64 = 0.5;

/// Envelope floor / ceiling on the 0-255 value scale
pub const BREATH_VALUE_MIN: f64 = 120.0;
pub const BREATH_VALUE_MAX: f64 = 255.0;

/// Hue and saturation at the envelope floor
pub const BREATH_HUE_LOW: u8 = 15;
pub const BREATH_SAT_LOW: u8 = 230;

/// Hue and saturation at the envelope ceiling
pub const BREATH_HUE_HIGH: u8 = 95;
pub const BREATH_SAT_HIGH: u8 = 255;

/// Pixels per display region
pub const REGION_PIXELS: usize = 5;

// =============================================================================
// SEQUENCE GAME [C]
// =============================================================================

/// Note frequencies (Hz), button channel i plays note i+1
pub const NOTE_C: u32 = 262;
pub const NOTE_D: u32 = 294;
pub const NOTE_E: u32 = 330;
pub const NOTE_F: u32 = 349;
pub const NOTE_G: u32 = 392;
pub const NOTE_A: u32 = 440;

/// Frequencies indexed by channel
pub const NOTE_TABLE: [u32; 6] = [NOTE_C, NOTE_D, NOTE_E, NOTE_F, NOTE_G, NOTE_A];

/// Number of button/light channels
pub const CHANNEL_COUNT: usize = 6;

/// Fixed melody, 1-based note numbers (1=C .. 6=A)
pub const MELODY: [u8; 15] = [3, 3, 4, 5, 5, 4, 3, 2, 1, 1, 2, 3, 3, 2, 2];

/// Gap between presented notes (milliseconds)
pub const STEP_DELAY_MS: u64 = 800;

/// Tone and light duration of a presented note (milliseconds)
pub const NOTE_DURATION_MS: u64 = 300;

/// Tone length for a pressed button (milliseconds)
pub const BUTTON_TONE_MS: u64 = 200;

/// Pause after a completed level (milliseconds)
pub const LEVEL_PAUSE_MS: u64 = 1000;

// =============================================================================
// SIGNAL CONDITIONER [C]
// =============================================================================

/// Smoothed distance below which a session starts (cm)
pub const START_THRESHOLD_CM: f64 = 2.8;

/// Smoothed distance above which a session stops (cm)
pub const STOP_THRESHOLD_CM: f64 = 3.5;

/// Time below the start threshold before Start (milliseconds)
pub const START_DEBOUNCE_MS: u64 = 250;

/// Time above the stop threshold before Stop (milliseconds)
pub const STOP_DEBOUNCE_MS: u64 = 700;

/// Moving-average window (valid samples)
pub const SMOOTHING_WINDOW: usize = 5;

/// Telemetry field the conditioner listens to
pub const DEFAULT_FIELD_LABEL: &str = "B";

// =============================================================================
// TIMING [C]
// =============================================================================

/// Nominal control-loop cadence (milliseconds)
pub const CONTROL_TICK_MS: u64 = 50;

/// Telemetry line cadence (milliseconds)
pub const TELEMETRY_INTERVAL_MS: u64 = 2000;

/// Slideshow advance period (milliseconds)
pub const SLIDE_INTERVAL_MS: u64 = 3000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
