//! Signal conditioner: telemetry lines → slideshow Start/Stop
//!
//! Pipeline per line:
//! 1. parse the watched field (unreadable lines and no-echo are skipped)
//! 2. moving average over the last K valid values
//! 3. hysteresis with asymmetric debounce:
//!    - avg < start threshold, held ≥ start debounce → START
//!    - avg > stop threshold, held ≥ stop debounce → STOP
//!    - between the thresholds → both timers cleared
//!
//! Start is quick, Stop is reluctant. At most one transition per line, and
//! never a repeated Start or Stop.

use std::collections::VecDeque;
use crate::config::ConditionerConfig;
use crate::core::line_parser::{LineParser, ParsedLine};
use crate::types::{ConditionerOutput, Decision, ReasonCode};

/// Ring buffer of the last K valid samples
#[derive(Debug, Clone)]
pub struct Smoother {
    window: VecDeque<f64>,
    capacity: usize,
}

impl Smoother {
    /// Empty window holding at most `capacity` values
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a sample, evicting the oldest when full
    pub fn push(&mut self, value: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    /// Arithmetic mean, `None` while empty
    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    /// Values currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True before the first value
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Edge timers and the authoritative session flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HysteresisTimer {
    pub below_since: Option<u64>,
    pub above_since: Option<u64>,
    pub active: bool,
}

/// Conditioner state machine
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    parser: LineParser,
    smoother: Smoother,
    timer: HysteresisTimer,
    start_threshold: f64,
    stop_threshold: f64,
    start_debounce_ms: u64,
    stop_debounce_ms: u64,
    lines_seen: u64,
    lines_dropped: u64,
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self::new(&ConditionerConfig::default())
    }
}

impl SignalConditioner {
    /// Conditioner with thresholds, debounces and label from the config
    pub fn new(config: &ConditionerConfig) -> Self {
        Self {
            parser: LineParser::new(config.label.clone()),
            smoother: Smoother::new(config.smoothing_window),
            timer: HysteresisTimer::default(),
            start_threshold: config.start_threshold_cm,
            stop_threshold: config.stop_threshold_cm,
            start_debounce_ms: config.start_debounce_ms,
            stop_debounce_ms: config.stop_debounce_ms,
            lines_seen: 0,
            lines_dropped: 0,
        }
    }

    /// Ingest one raw telemetry line received at `now_ms`
    pub fn ingest(&mut self, line: &str, now_ms: u64) -> ConditionerOutput {
        self.lines_seen += 1;
        match self.parser.parse(line) {
            ParsedLine::Value(v) => self.ingest_value(v, now_ms),
            ParsedLine::NoEcho => {
                log::trace!("no echo in {:?}", line);
                self.skipped(ReasonCode::R001_NO_ECHO)
            }
            ParsedLine::Unrecognized => {
                self.lines_dropped += 1;
                log::debug!("dropped line {:?}", line);
                self.skipped(ReasonCode::R001_LINE_DROPPED)
            }
        }
    }

    /// Ingest an already parsed distance
    pub fn ingest_value(&mut self, value: f64, now_ms: u64) -> ConditionerOutput {
        self.smoother.push(value);
        let Some(smoothed) = self.smoother.mean() else {
            return self.skipped(ReasonCode::R001_NO_ECHO);
        };
        let (decision, reason) = self.evaluate(smoothed, now_ms);
        ConditionerOutput::new(Some(value), Some(smoothed), decision, self.timer.active, reason)
    }

    fn evaluate(&mut self, smoothed: f64, now_ms: u64) -> (Decision, ReasonCode) {
        let t = &mut self.timer;

        if smoothed < self.start_threshold {
            t.above_since = None;
            let since = *t.below_since.get_or_insert(now_ms);
            if t.active {
                return (Decision::NoChange, ReasonCode::R002_STATE_ACTIVE);
            }
            let held = now_ms.saturating_sub(since);
            if held >= self.start_debounce_ms {
                t.active = true;
                log::info!("start: avg {:.2} below {} for {} ms", smoothed, self.start_threshold, held);
                return (Decision::Start, ReasonCode::R005_TRANSITION_TO_START);
            }
            return (Decision::NoChange, ReasonCode::R003_START_DEBOUNCE_ACCUMULATING);
        }

        if smoothed > self.stop_threshold {
            t.below_since = None;
            let since = *t.above_since.get_or_insert(now_ms);
            if !t.active {
                return (Decision::NoChange, ReasonCode::R002_STATE_INACTIVE);
            }
            let held = now_ms.saturating_sub(since);
            if held >= self.stop_debounce_ms {
                t.active = false;
                log::info!("stop: avg {:.2} above {} for {} ms", smoothed, self.stop_threshold, held);
                return (Decision::Stop, ReasonCode::R005_TRANSITION_TO_STOP);
            }
            return (Decision::NoChange, ReasonCode::R003_STOP_DEBOUNCE_ACCUMULATING);
        }

        t.below_since = None;
        t.above_since = None;
        (Decision::NoChange, ReasonCode::R004_DEAD_ZONE)
    }

    fn skipped(&self, reason: ReasonCode) -> ConditionerOutput {
        ConditionerOutput::new(None, self.smoother.mean(), Decision::NoChange, self.timer.active, reason)
    }

    /// True between a Start and the next Stop
    pub fn is_active(&self) -> bool {
        self.timer.active
    }

    /// Current window average
    pub fn smoothed(&self) -> Option<f64> {
        self.smoother.mean()
    }

    /// Copy of the hysteresis timer state
    pub fn timer(&self) -> HysteresisTimer {
        self.timer
    }

    /// Lines ingested so far
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// Lines without the watched field
    pub fn lines_dropped(&self) -> u64 {
        self.lines_dropped
    }
}

// =============================================================================
// TESTS
// =============================================================================
