//! Button scan: per-tick read of every channel
//!
//! Each channel's light mirrors its button. A firing button plays its note
//! and, while the game is answering, is forwarded as a move.
//!
//! Level triggering (the default) fires on every tick a button is held, so a
//! long press repeats both the tone and the move. Edge triggering fires only
//! on the released → pressed transition.

use crate::config::{DeviceConfig, TriggerMode};
use crate::core::SequenceGameController;
use crate::types::{ButtonEvent, FeedbackAction, GameUpdate};

/// Everything one scan produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonScan {
    /// Immediate, non-blocking outputs
    pub actions: Vec<FeedbackAction>,
    /// Buttons that fired this tick
    pub fired: Vec<ButtonEvent>,
    /// Game results for the fired buttons that were forwarded
    pub updates: Vec<GameUpdate>,
}

/// Scans N input channels
#[derive(Debug, Clone)]
pub struct ButtonInputManager {
    notes: Vec<u32>,
    tone_ms: u64,
    trigger: TriggerMode,
    previous: Vec<bool>,
}

impl Default for ButtonInputManager {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}

impl ButtonInputManager {
    /// Scanner for the configured channel count and trigger mode
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            notes: config.notes.clone(),
            tone_ms: config.button_tone_ms,
            trigger: config.trigger,
            previous: vec![false; config.notes.len()],
        }
    }

    /// Number of button channels
    pub fn channels(&self) -> usize {
        self.notes.len()
    }

    /// Active trigger mode
    pub fn trigger(&self) -> TriggerMode {
        self.trigger
    }

    /// Read one tick of button levels; missing entries count as released
    pub fn scan(&mut self, levels: &[bool], game: &mut SequenceGameController) -> ButtonScan {
        let mut scan = ButtonScan::default();

        for (channel, &freq) in self.notes.iter().enumerate() {
            let pressed = levels.get(channel).copied().unwrap_or(false);
            let was_pressed = std::mem::replace(&mut self.previous[channel], pressed);
            scan.actions.push(FeedbackAction::Light { channel, on: pressed });

            let fires = match self.trigger {
                TriggerMode::Level => pressed,
                TriggerMode::Edge => pressed && !was_pressed,
            };
            if !fires {
                continue;
            }

            let event = ButtonEvent::new(channel);
            scan.actions.push(FeedbackAction::Tone {
                frequency_hz: freq,
                duration_ms: self.tone_ms,
            });
            scan.fired.push(event);

            // The game may leave the answer phase mid-scan, later buttons are
            // then feedback only
            if game.is_awaiting_input() {
                scan.updates.push(game.accept_input(event));
            }
        }

        scan
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameEvent;
    use crate::NOTE_E;

    fn awaiting_game() -> SequenceGameController {
        let mut game = SequenceGameController::default();
        game.tick(0); // presents note 3, ends at 300
        game.tick(1200); // → awaiting input
        assert!(game.is_awaiting_input());
        game
    }

    #[test]
    fn test_lights_mirror_levels() {
        let mut buttons = ButtonInputManager::default();
        let mut game = SequenceGameController::default();
        let scan = buttons.scan(&[false, true], &mut game);
        assert!(scan.actions.contains(&FeedbackAction::Light { channel: 1, on: true }));
        assert!(scan.actions.contains(&FeedbackAction::Light { channel: 0, on: false }));
        assert!(scan.actions.contains(&FeedbackAction::Light { channel: 5, on: false }));
    }

    #[test]
    fn test_press_outside_answer_is_feedback_only() {
        let mut buttons = ButtonInputManager::default();
        let mut game = SequenceGameController::default();
        let scan = buttons.scan(&[false, false, true], &mut game);
        assert!(scan.actions.contains(&FeedbackAction::Tone { frequency_hz: NOTE_E, duration_ms: 200 }));
        assert_eq!(scan.fired, vec![ButtonEvent::new(2)]);
        assert!(scan.updates.is_empty());
    }

    #[test]
    fn test_level_trigger_repeats_while_held() {
        let mut buttons = ButtonInputManager::default();
        let mut game = SequenceGameController::default();
        for _ in 0..3 {
            let scan = buttons.scan(&[true], &mut game);
            assert_eq!(scan.fired.len(), 1);
        }
    }

    #[test]
    fn test_edge_trigger_fires_once_per_press() {
        let config = DeviceConfig {
            trigger: TriggerMode::Edge,
            ..DeviceConfig::default()
        };
        let mut buttons = ButtonInputManager::new(&config);
        let mut game = SequenceGameController::default();
        assert_eq!(buttons.scan(&[true], &mut game).fired.len(), 1);
        assert!(buttons.scan(&[true], &mut game).fired.is_empty());
        assert!(buttons.scan(&[false], &mut game).fired.is_empty());
        assert_eq!(buttons.scan(&[true], &mut game).fired.len(), 1);
    }

    #[test]
    fn test_forwarded_press_reaches_game() {
        let mut buttons = ButtonInputManager::default();
        let mut game = awaiting_game();
        let scan = buttons.scan(&[false, false, true], &mut game);
        assert_eq!(scan.updates.len(), 1);
        assert_eq!(scan.updates[0].event, GameEvent::LevelComplete { level: 1 });
    }

    #[test]
    fn test_held_button_counts_again_when_level_triggered() {
        // Level 1 needs [3, 3]: holding button 3 for two ticks answers it
        let mut buttons = ButtonInputManager::default();
        let mut game = awaiting_game();
        buttons.scan(&[false, false, true], &mut game);
        let mut now = 1200;
        while !game.is_awaiting_input() {
            now += 50;
            game.tick(now);
        }
        let first = buttons.scan(&[false, false, true], &mut game);
        assert_eq!(first.updates[0].event, GameEvent::Correct { step: 0 });
        let second = buttons.scan(&[false, false, true], &mut game);
        assert_eq!(second.updates[0].event, GameEvent::LevelComplete { level: 2 });
    }

    #[test]
    fn test_wrong_press_stops_forwarding_rest_of_scan() {
        let mut buttons = ButtonInputManager::default();
        let mut game = awaiting_game();
        // Button 1 is wrong (expected 3), button 3 in the same scan is dropped
        let scan = buttons.scan(&[true, false, true], &mut game);
        assert_eq!(scan.fired.len(), 2);
        assert_eq!(scan.updates.len(), 1);
        assert_eq!(scan.updates[0].event, GameEvent::Failed);
    }
}
