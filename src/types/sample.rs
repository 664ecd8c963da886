//! Distance samples

use serde::{Deserialize, Serialize};

use crate::MIN_PHYSICAL_DISTANCE_CM;

/// One distance measurement attempt
///
/// `value` is `None` when no echo arrived before the timeout. A present
/// value is either 0 or at least `MIN_PHYSICAL_DISTANCE_CM`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    /// Distance in centimetres, `None` for no echo
    pub value: Option<f64>,
    /// When the measurement was taken (milliseconds)
    pub timestamp_ms: u64,
}

impl DistanceSample {
    /// A sample carrying a distance; anything under the physical floor reads 0
    pub fn new(value: f64, timestamp_ms: u64) -> Self {
        let value = if value.is_nan() || value < MIN_PHYSICAL_DISTANCE_CM { 0.0 } else { value };
        Self {
            value: Some(value),
            timestamp_ms,
        }
    }

    /// A timed-out measurement
    pub fn no_echo(timestamp_ms: u64) -> Self {
        Self {
            value: None,
            timestamp_ms,
        }
    }

    /// True when the sensor heard an echo
    pub fn is_echo(&self) -> bool {
        self.value.is_some()
    }

    /// Telemetry rendering: `12.34 cm`, or `—` for no echo
    pub fn display_value(&self) -> String {
        match self.value {
            Some(v) => format!("{:.2} cm", v),
            None => "—".to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
