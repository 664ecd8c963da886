//! On-device control loop
//!
//! One `tick` per loop iteration (nominally every 50 ms):
//! 1. play due feedback; while a burst is running nothing else happens
//! 2. sample both sensors, gate them, drive regions A (breathing) and B (rainbow)
//! 3. emit a telemetry line every couple of seconds
//! 4. scan buttons, forwarding moves to the game
//! 5. tick the game
//!
//! Feedback bursts from steps 4 and 5 go into the scheduler and block the
//! following ticks until they finish.

use crate::config::DeviceConfig;
use crate::core::{
    rainbow_static, BreathingCommand, BreathingEffectEngine, ButtonInputManager, DistanceSampler,
    FeedbackPatterns, FeedbackScheduler, PresenceGate, SequenceGameController,
};
use crate::types::{DistanceSample, FeedbackAction, GameUpdate, Region, Rgb};

/// Output hardware: lights, speaker and the two display regions
pub trait FeedbackSink {
    fn apply(&mut self, action: &FeedbackAction);
}

impl FeedbackSink for Vec<FeedbackAction> {
    fn apply(&mut self, action: &FeedbackAction) {
        self.push(action.clone());
    }
}

/// In-memory model of the device outputs
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub lights: Vec<bool>,
    pub tone_hz: Option<u32>,
    pub region_a: Vec<Rgb>,
    pub region_b: Vec<Rgb>,
}

impl PanelState {
    /// All channels and pixels dark
    pub fn new(channels: usize, pixels: usize) -> Self {
        Self {
            lights: vec![false; channels],
            tone_hz: None,
            region_a: vec![Rgb::OFF; pixels],
            region_b: vec![Rgb::OFF; pixels],
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut Vec<Rgb> {
        match region {
            Region::A => &mut self.region_a,
            Region::B => &mut self.region_b,
        }
    }

    /// True when every pixel in the region is off
    pub fn is_dark(&self, region: Region) -> bool {
        let pixels = match region {
            Region::A => &self.region_a,
            Region::B => &self.region_b,
        };
        pixels.iter().all(|p| *p == Rgb::OFF)
    }
}

impl FeedbackSink for PanelState {
    fn apply(&mut self, action: &FeedbackAction) {
        match action {
            FeedbackAction::Light { channel, on } => {
                if let Some(light) = self.lights.get_mut(*channel) {
                    *light = *on;
                }
            }
            FeedbackAction::AllLights { on } => self.lights.iter_mut().for_each(|l| *l = *on),
            FeedbackAction::Tone { frequency_hz, .. } => self.tone_hz = Some(*frequency_hz),
            FeedbackAction::ToneOff => self.tone_hz = None,
            FeedbackAction::Fill { region, color } => {
                self.region_mut(*region).iter_mut().for_each(|p| *p = *color)
            }
            FeedbackAction::Pixels { region, colors } => {
                let pixels = self.region_mut(*region);
                for (p, c) in pixels.iter_mut().zip(colors) {
                    *p = *c;
                }
            }
            FeedbackAction::Clear { region } => {
                self.region_mut(*region).iter_mut().for_each(|p| *p = Rgb::OFF)
            }
        }
    }
}

/// What one loop iteration did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub now_ms: u64,
    /// True when a feedback burst consumed the whole tick
    pub blocked: bool,
    pub actions: Vec<FeedbackAction>,
    pub telemetry: Option<String>,
    pub game: Vec<GameUpdate>,
    pub gate_a: bool,
    pub gate_b: bool,
}

/// `A: 12.34 cm | B: —`
pub fn format_telemetry(a: &DistanceSample, b: &DistanceSample) -> String {
    format!("A: {} | B: {}", a.display_value(), b.display_value())
}

/// The whole on-device loop
#[derive(Debug)]
pub struct DeviceLoop<SA, SB> {
    sensor_a: SA,
    sensor_b: SB,
    gate: PresenceGate,
    breathing: BreathingEffectEngine,
    buttons: ButtonInputManager,
    game: SequenceGameController,
    scheduler: FeedbackScheduler,
    patterns: FeedbackPatterns,
    melody: Vec<u8>,
    startup_melody: bool,
    region_pixels: usize,
    telemetry_interval_ms: u64,
    last_telemetry_ms: Option<u64>,
}

impl<SA: DistanceSampler, SB: DistanceSampler> DeviceLoop<SA, SB> {
    /// Loop over two sensors with the given device config
    pub fn new(config: &DeviceConfig, sensor_a: SA, sensor_b: SB) -> Self {
        Self {
            sensor_a,
            sensor_b,
            gate: PresenceGate::new(config.presence_threshold_cm),
            breathing: BreathingEffectEngine::new(config),
            buttons: ButtonInputManager::new(config),
            game: SequenceGameController::new(config),
            scheduler: FeedbackScheduler::new(),
            patterns: FeedbackPatterns::new(config),
            melody: config.melody.clone(),
            startup_melody: config.startup_melody,
            region_pixels: config.region_pixels,
            telemetry_interval_ms: config.telemetry_interval_ms,
            last_telemetry_ms: None,
        }
    }

    /// Power-on: queue the startup melody
    pub fn boot(&mut self, now_ms: u64) {
        log::info!("boot, {} channels", self.buttons.channels());
        if self.startup_melody {
            let melody = self.patterns.startup(&self.melody);
            self.scheduler.schedule(melody, now_ms);
        }
    }

    /// One control-loop iteration with the current button levels
    pub fn tick(&mut self, now_ms: u64, buttons: &[bool]) -> TickReport {
        let mut report = TickReport {
            now_ms,
            actions: self.scheduler.advance(now_ms),
            ..TickReport::default()
        };
        if self.scheduler.is_busy() {
            report.blocked = true;
            return report;
        }

        self.sense(now_ms, &mut report);

        let scan = self.buttons.scan(buttons, &mut self.game);
        report.actions.extend(scan.actions);
        for update in scan.updates {
            self.queue_feedback(&update, now_ms);
            report.game.push(update);
        }

        // The game sees the time at which any queued burst will have ended
        let game_now = self.scheduler.busy_until(now_ms);
        let update = self.game.tick(game_now);
        self.queue_feedback(&update, now_ms);
        report.game.push(update);

        // Bursts starting right now fire their first actions this tick
        report.actions.extend(self.scheduler.advance(now_ms));
        report
    }

    /// Tick and push every action into a sink
    pub fn tick_into(&mut self, now_ms: u64, buttons: &[bool], sink: &mut impl FeedbackSink) -> TickReport {
        let report = self.tick(now_ms, buttons);
        for action in &report.actions {
            sink.apply(action);
        }
        report
    }

    fn sense(&mut self, now_ms: u64, report: &mut TickReport) {
        let a = self.sensor_a.sample(now_ms);
        let b = self.sensor_b.sample(now_ms);
        report.gate_a = self.gate.classify(&a);
        report.gate_b = self.gate.classify(&b);
        log::trace!("sensors a={:?} b={:?}", a.value, b.value);

        match self.breathing.tick(now_ms, report.gate_a) {
            BreathingCommand::Fill(frame) => report.actions.push(FeedbackAction::Fill {
                region: Region::A,
                color: frame.color,
            }),
            BreathingCommand::Clear => report.actions.push(FeedbackAction::Clear { region: Region::A }),
            BreathingCommand::Hold => {}
        }

        report.actions.push(if report.gate_b {
            FeedbackAction::Pixels {
                region: Region::B,
                colors: rainbow_static(self.region_pixels),
            }
        } else {
            FeedbackAction::Clear { region: Region::B }
        });

        let due = self
            .last_telemetry_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.telemetry_interval_ms);
        if due {
            report.telemetry = Some(format_telemetry(&a, &b));
            self.last_telemetry_ms = Some(now_ms);
        }
    }

    fn queue_feedback(&mut self, update: &GameUpdate, now_ms: u64) {
        if let Some(seq) = &update.feedback {
            if !seq.steps.is_empty() {
                self.scheduler.schedule(seq.clone(), now_ms);
            }
        }
    }

    /// The sequence game
    pub fn game(&self) -> &SequenceGameController {
        &self.game
    }

    /// The feedback scheduler
    pub fn scheduler(&self) -> &FeedbackScheduler {
        &self.scheduler
    }

    /// Number of button/light channels
    pub fn channels(&self) -> usize {
        self.buttons.channels()
    }
}

// =============================================================================
// TESTS
// =============================================================================
