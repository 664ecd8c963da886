//! Presence gate: instant threshold over the latest sample
//!
//! No smoothing and no memory. Flicker is acceptable on the decorative
//! lighting path this feeds.

use crate::types::DistanceSample;
use crate::PRESENCE_THRESHOLD_CM;

/// Threshold classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenceGate {
    threshold_cm: f64,
}

impl Default for PresenceGate {
    fn default() -> Self {
        Self::new(PRESENCE_THRESHOLD_CM)
    }
}

impl PresenceGate {
    /// Gate that opens strictly beyond `threshold_cm`
    pub fn new(threshold_cm: f64) -> Self {
        Self { threshold_cm }
    }

    /// True iff the sample has an echo strictly beyond the threshold
    pub fn classify(&self, sample: &DistanceSample) -> bool {
        sample.value.is_some_and(|v| v > self.threshold_cm)
    }

    /// Open threshold in centimetres
    pub fn threshold_cm(&self) -> f64 {
        self.threshold_cm
    }
}

// =============================================================================
// TESTS
// =============================================================================
