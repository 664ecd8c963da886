//! Integration tests for the on-device loop
//!
//! Sensors are scripted, time advances in fixed control ticks, and the panel
//! model records what the hardware would show.

use presencebox::config::{DeviceConfig, TriggerMode};
use presencebox::core::{DeviceLoop, FeedbackPatterns, PanelState, ScriptedSampler, TickReport};
use presencebox::types::{FeedbackKind, GameEvent, Region};
use presencebox::{CHANNEL_COUNT, CONTROL_TICK_MS, MELODY, REGION_PIXELS};

fn quiet() -> DeviceConfig {
    DeviceConfig {
        startup_melody: false,
        ..DeviceConfig::default()
    }
}

fn far() -> ScriptedSampler {
    ScriptedSampler::constant(Some(10.0))
}

/// Run the loop, pressing the expected button on alternate free ticks
fn autoplay(
    device: &mut DeviceLoop<ScriptedSampler, ScriptedSampler>,
    panel: &mut PanelState,
    ticks: u64,
    mut on_report: impl FnMut(&TickReport) -> bool,
) {
    let mut pressed_last = false;
    for i in 0..ticks {
        let now = i * CONTROL_TICK_MS;
        let mut buttons = vec![false; device.channels()];
        if !pressed_last && !device.scheduler().is_busy() {
            if let Some(note) = device.game().expected_note() {
                buttons[note as usize - 1] = true;
            }
        }
        pressed_last = buttons.iter().any(|b| *b);
        let report = device.tick_into(now, &buttons, panel);
        if !on_report(&report) {
            return;
        }
    }
}

// =============================================================================
// GAME THROUGH THE LOOP
// =============================================================================

#[test]
fn test_autoplayed_game_is_won() {
    for trigger in [TriggerMode::Level, TriggerMode::Edge] {
        let config = DeviceConfig { trigger, ..DeviceConfig::default() };
        let mut device = DeviceLoop::new(&config, far(), far());
        let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);
        device.boot(0);

        let mut won = false;
        let mut levels = 0;
        autoplay(&mut device, &mut panel, 20_000, |report| {
            for update in &report.game {
                match update.event {
                    GameEvent::LevelComplete { .. } => levels += 1,
                    GameEvent::Won => won = true,
                    GameEvent::Failed => panic!("autoplay pressed a wrong button ({:?})", trigger),
                    _ => {}
                }
            }
            !won
        });

        assert!(won, "no win with {:?}", trigger);
        assert_eq!(levels, MELODY.len());
        assert_eq!(device.game().wins(), 1);
        assert_eq!(device.game().level(), 0);
    }
}

#[test]
fn test_notes_are_spaced_by_step_delay() {
    let mut device = DeviceLoop::new(&quiet(), far(), far());
    let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);
    let mut shown = Vec::new();
    autoplay(&mut device, &mut panel, 4_000, |report| {
        for update in &report.game {
            if let GameEvent::NotePresented { step, .. } = update.event {
                shown.push((step, report.now_ms));
            }
        }
        shown.len() < 10
    });

    // Within a turn, each note waits out the previous burst plus the step delay
    for pair in shown.windows(2) {
        let ((prev_step, prev_t), (step, t)) = (pair[0], pair[1]);
        if step == prev_step + 1 {
            assert!(t - prev_t > 300 + 800, "steps {} → {} only {} ms apart", prev_step, step, t - prev_t);
        }
    }
}

#[test]
fn test_wrong_press_blocks_for_fail_burst() {
    let mut device = DeviceLoop::new(&quiet(), far(), far());
    let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);

    let mut now = 0;
    while !device.game().is_awaiting_input() {
        device.tick_into(now, &[], &mut panel);
        now += CONTROL_TICK_MS;
        assert!(now < 10_000);
    }

    let expected = device.game().expected_note().unwrap() as usize - 1;
    let mut buttons = vec![false; CHANNEL_COUNT];
    buttons[(expected + 1) % CHANNEL_COUNT] = true;
    let report = device.tick_into(now, &buttons, &mut panel);
    assert!(report.game.iter().any(|u| u.event == GameEvent::Failed));
    assert_eq!(device.scheduler().current(), Some(FeedbackKind::Fail));

    let fail_ms = FeedbackPatterns::default().fail().duration_ms();
    let mut t = now + CONTROL_TICK_MS;
    while t < now + fail_ms {
        let report = device.tick_into(t, &[true; CHANNEL_COUNT], &mut panel);
        assert!(report.blocked, "loop ran during fail burst at {}", t);
        assert!(report.telemetry.is_none());
        t += CONTROL_TICK_MS;
    }
    assert_eq!(device.game().fails(), 1);
}

// =============================================================================
// PRESENCE REGIONS
// =============================================================================

#[test]
fn test_region_a_tracks_presence() {
    // Hand far (lit), then too close (dark), then far again (lit)
    let readings = std::iter::repeat(Some(10.0))
        .take(5)
        .chain(std::iter::repeat(Some(1.0)).take(5))
        .chain(std::iter::repeat(Some(10.0)).take(5));
    let mut device = DeviceLoop::new(&quiet(), ScriptedSampler::new(readings), far());
    let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);

    let mut lit = Vec::new();
    let mut now = 0;
    while lit.len() < 15 {
        let report = device.tick_into(now, &[], &mut panel);
        if !report.blocked {
            lit.push(!panel.is_dark(Region::A));
        }
        now += CONTROL_TICK_MS;
    }

    assert!(lit[..5].iter().all(|l| *l));
    assert!(lit[5..10].iter().all(|l| !*l));
    assert!(lit[10..].iter().all(|l| *l));
}

#[test]
fn test_no_echo_darkens_both_regions() {
    let mut device = DeviceLoop::new(
        &quiet(),
        ScriptedSampler::constant(None),
        ScriptedSampler::constant(None),
    );
    let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);
    let report = device.tick_into(0, &[], &mut panel);
    assert!(!report.gate_a);
    assert!(!report.gate_b);
    assert!(panel.is_dark(Region::A));
    assert!(panel.is_dark(Region::B));
    assert_eq!(report.telemetry.as_deref(), Some("A: — | B: —"));
}

#[test]
fn test_region_b_shows_rainbow() {
    let mut device = DeviceLoop::new(&quiet(), far(), far());
    let mut panel = PanelState::new(CHANNEL_COUNT, REGION_PIXELS);
    device.tick_into(0, &[], &mut panel);
    assert!(!panel.is_dark(Region::B));
    // Every pixel a different hue
    for pair in panel.region_b.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}
