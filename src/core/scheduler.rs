//! Feedback scheduler: plays queued bursts against explicit time
//!
//! A burst is a list of actions and waits. While one is playing the device
//! loop does nothing else, so bursts are atomic from the loop's point of view.
//! Bursts queued behind it start where the previous one ends.

use std::collections::VecDeque;
use crate::types::{FeedbackAction, FeedbackKind, FeedbackSequence, FeedbackStep};

#[derive(Debug, Clone)]
struct Running {
    kind: FeedbackKind,
    steps: VecDeque<FeedbackStep>,
    /// Time the next step becomes due
    due_ms: u64,
}

/// Queue of timed feedback bursts
#[derive(Debug, Default)]
pub struct FeedbackScheduler {
    running: Option<Running>,
    queue: VecDeque<FeedbackSequence>,
    /// When the last finished burst ended; queued bursts start no earlier
    idle_since_ms: u64,
}

impl FeedbackScheduler {
    /// Idle scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a burst; it starts at `now_ms` if nothing is playing
    pub fn schedule(&mut self, sequence: FeedbackSequence, now_ms: u64) {
        log::debug!("feedback {:?} queued ({} ms)", sequence.kind, sequence.duration_ms());
        if self.running.is_none() && self.queue.is_empty() {
            self.idle_since_ms = self.idle_since_ms.max(now_ms);
        }
        self.queue.push_back(sequence);
    }

    /// Emit every action due at or before `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> Vec<FeedbackAction> {
        let mut fired = Vec::new();
        loop {
            if self.running.is_none() {
                match self.queue.pop_front() {
                    Some(seq) => {
                        self.running = Some(Running {
                            kind: seq.kind,
                            steps: seq.steps.into(),
                            due_ms: self.idle_since_ms,
                        });
                    }
                    None => return fired,
                }
            }

            let Some(run) = self.running.as_mut() else {
                return fired;
            };
            if run.due_ms > now_ms {
                return fired;
            }
            match run.steps.pop_front() {
                Some(FeedbackStep::Do(action)) => fired.push(action),
                Some(FeedbackStep::Wait(ms)) => run.due_ms += ms,
                None => {
                    log::trace!("feedback {:?} finished at {}", run.kind, run.due_ms);
                    self.idle_since_ms = run.due_ms;
                    self.running = None;
                }
            }
        }
    }

    /// True while a burst is playing or waiting to play
    pub fn is_busy(&self) -> bool {
        self.running.is_some() || !self.queue.is_empty()
    }

    /// Kind of the burst currently playing
    pub fn current(&self) -> Option<FeedbackKind> {
        self.running.as_ref().map(|r| r.kind)
    }

    /// When everything queued so far will have finished
    pub fn busy_until(&self, now_ms: u64) -> u64 {
        let start = match &self.running {
            Some(run) => {
                run.due_ms
                    + run
                        .steps
                        .iter()
                        .map(|s| match s {
                            FeedbackStep::Wait(ms) => *ms,
                            FeedbackStep::Do(_) => 0,
                        })
                        .sum::<u64>()
            }
            None => self.idle_since_ms.max(now_ms),
        };
        start + self.queue.iter().map(|s| s.duration_ms()).sum::<u64>()
    }
}

// =============================================================================
// TESTS
// =============================================================================
