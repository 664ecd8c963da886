//! Breathing effect: time-driven colour pulse for display region A
//!
//! Envelope: `exp(sin(speed·t/2000·π))`, shifted and scaled into
//! `[value_min, value_max]`. The exponential makes the peak narrow and the
//! trough wide, which reads as a quick inhale and a slow exhale.
//!
//! Hue and saturation follow the envelope linearly between two endpoints,
//! then the triple goes through the three-band colour wheel.

use std::f64::consts::{E, PI};
use crate::config::{DeviceConfig, PhaseResetPolicy};
use crate::types::{Hsv, Rgb};
use crate::{
    BREATH_HUE_HIGH, BREATH_HUE_LOW, BREATH_SAT_HIGH, BREATH_SAT_LOW, BREATH_VALUE_MAX,
    BREATH_VALUE_MIN,
};

/// One rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingFrame {
    pub hsv: Hsv,
    pub color: Rgb,
}

/// What the region should do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathingCommand {
    /// Paint every pixel with this frame
    Fill(BreathingFrame),
    /// Gate closed, turn the region off
    Clear,
    /// Gate open but too soon since the last frame
    Hold,
}

/// Breathing state machine
#[derive(Debug, Clone)]
pub struct BreathingEffectEngine {
    interval_ms: u64,
    pulse_speed: f64,
    policy: PhaseResetPolicy,
    /// Time spent with the gate open, drives the waveform
    phase_ms: u64,
    /// Previous tick time while the gate was open
    last_open_ms: Option<u64>,
    last_update_ms: Option<u64>,
}

impl Default for BreathingEffectEngine {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}

impl BreathingEffectEngine {
    /// Breathing engine with the configured pulse speed and phase policy
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            interval_ms: config.breath_interval_ms,
            pulse_speed: config.pulse_speed,
            policy: config.phase_policy,
            phase_ms: 0,
            last_open_ms: None,
            last_update_ms: None,
        }
    }

    /// Advance one control-loop tick
    pub fn tick(&mut self, now_ms: u64, gate_open: bool) -> BreathingCommand {
        if !gate_open {
            self.last_open_ms = None;
            if self.policy == PhaseResetPolicy::Reset {
                self.phase_ms = 0;
            }
            return BreathingCommand::Clear;
        }

        if let Some(prev) = self.last_open_ms {
            self.phase_ms += now_ms.saturating_sub(prev);
        }
        self.last_open_ms = Some(now_ms);

        if let Some(last) = self.last_update_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return BreathingCommand::Hold;
            }
        }
        self.last_update_ms = Some(now_ms);

        let frame = breathing_frame(self.phase_ms, self.pulse_speed);
        log::trace!("breath phase={}ms val={}", self.phase_ms, frame.hsv.val);
        BreathingCommand::Fill(frame)
    }

    /// Accumulated open-gate time
    pub fn phase_ms(&self) -> u64 {
        self.phase_ms
    }
}

/// Envelope value on the `[BREATH_VALUE_MIN, BREATH_VALUE_MAX]` scale
pub fn envelope(t_ms: u64, pulse_speed: f64) -> f64 {
    let x = pulse_speed * t_ms as f64 / 2000.0 * PI;
    let norm = (x.sin().exp() - 1.0 / E) / (E - 1.0 / E);
    (BREATH_VALUE_MIN + norm * (BREATH_VALUE_MAX - BREATH_VALUE_MIN))
        .clamp(BREATH_VALUE_MIN, BREATH_VALUE_MAX)
}

/// Full frame at a given phase
pub fn breathing_frame(t_ms: u64, pulse_speed: f64) -> BreathingFrame {
    let val = envelope(t_ms, pulse_speed) as i64;
    let (lo, hi) = (BREATH_VALUE_MIN as i64, BREATH_VALUE_MAX as i64);
    let hue = map_range(val, lo, hi, BREATH_HUE_LOW as i64, BREATH_HUE_HIGH as i64);
    let sat = map_range(val, lo, hi, BREATH_SAT_LOW as i64, BREATH_SAT_HIGH as i64);
    let hsv = Hsv {
        hue: hue.clamp(0, 255) as u8,
        sat: sat.clamp(0, 255) as u8,
        val: val.clamp(0, 255) as u8,
    };
    BreathingFrame {
        hsv,
        color: hsv_to_rgb(hsv),
    }
}

/// Integer linear rescale, truncating toward zero
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Colour wheel scaled by value
///
/// The wheel is inverted (`255 - hue`) and split into three 85-wide bands,
/// each ramping linearly between two channels. Saturation is carried in the
/// triple but the wheel itself is fully saturated.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let (r, g, b) = wheel_channels(hsv.hue);
    let scale = |c: i64| map_range(hsv.val as i64, 0, 255, 0, c) as u8;
    Rgb::new(scale(r), scale(g), scale(b))
}

/// Unscaled colour wheel
pub fn color_wheel(pos: u8) -> Rgb {
    let (r, g, b) = wheel_channels(pos);
    Rgb::new(r as u8, g as u8, b as u8)
}

fn wheel_channels(pos: u8) -> (i64, i64, i64) {
    let p = 255 - pos as i64;
    if p < 85 {
        (255 - p * 3, 0, p * 3)
    } else if p < 170 {
        let p = p - 85;
        (0, p * 3, 255 - p * 3)
    } else {
        let p = p - 170;
        (p * 3, 255 - p * 3, 0)
    }
}

/// Static rainbow across a region, used for display region B
pub fn rainbow_static(pixels: usize) -> Vec<Rgb> {
    let step = 255 / pixels.saturating_sub(1).max(1);
    (0..pixels)
        .map(|i| color_wheel((i * step).min(255) as u8))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
