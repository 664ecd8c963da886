//! Distance sampling boundary
//!
//! The pulse timing itself lives in hardware. This module turns an echo
//! pulse width into a [`DistanceSample`] and defines the trait the device
//! loop reads sensors through.

use std::collections::VecDeque;
use crate::types::DistanceSample;
use crate::{ECHO_TIMEOUT_US, SOUND_CM_PER_US};

/// One physical measurement attempt per call
pub trait DistanceSampler {
    fn sample(&mut self, now_ms: u64) -> DistanceSample;
}

/// Convert an echo pulse width to a sample
///
/// A zero width (the pulse reader timed out) or one beyond the echo timeout
/// means no echo. Round-trip time is halved.
pub fn echo_to_distance(duration_us: u32, now_ms: u64) -> DistanceSample {
    if duration_us == 0 || duration_us > ECHO_TIMEOUT_US {
        return DistanceSample::no_echo(now_ms);
    }
    DistanceSample::new(duration_us as f64 * SOUND_CM_PER_US / 2.0, now_ms)
}

/// Replays a fixed list of readings, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    readings: VecDeque<Option<f64>>,
    last: Option<f64>,
}

impl ScriptedSampler {
    /// Replays readings in order, then holds the last one
    pub fn new(readings: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: None,
        }
    }

    /// Always report the same reading
    pub fn constant(reading: Option<f64>) -> Self {
        Self {
            readings: VecDeque::new(),
            last: reading,
        }
    }
}

impl DistanceSampler for ScriptedSampler {
    fn sample(&mut self, now_ms: u64) -> DistanceSample {
        if let Some(next) = self.readings.pop_front() {
            self.last = next;
        }
        match self.last {
            Some(v) => DistanceSample::new(v, now_ms),
            None => DistanceSample::no_echo(now_ms),
        }
    }
}

/// Synthetic sensor: a hand drifting slowly toward and away from the device
#[derive(Debug, Clone)]
pub struct WaveSampler {
    period_ms: u64,
    near_cm: f64,
    far_cm: f64,
    /// Every n-th reading drops out, 0 disables
    dropout_every: u64,
    count: u64,
}

impl WaveSampler {
    /// Sine sweep between `near_cm` and `far_cm`
    pub fn new(period_ms: u64, near_cm: f64, far_cm: f64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            near_cm,
            far_cm,
            dropout_every: 0,
            count: 0,
        }
    }

    /// Report no echo on every `every`-th sample
    pub fn with_dropout(mut self, every: u64) -> Self {
        self.dropout_every = every;
        self
    }
}

impl DistanceSampler for WaveSampler {
    fn sample(&mut self, now_ms: u64) -> DistanceSample {
        self.count += 1;
        if self.dropout_every > 0 && self.count % self.dropout_every == 0 {
            return DistanceSample::no_echo(now_ms);
        }
        let phase = (now_ms % self.period_ms) as f64 / self.period_ms as f64;
        let mid = (self.near_cm + self.far_cm) / 2.0;
        let amp = (self.far_cm - self.near_cm) / 2.0;
        DistanceSample::new(mid + amp * (phase * std::f64::consts::TAU).cos(), now_ms)
    }
}

// =============================================================================
// TESTS
// =============================================================================
