//! Sequence game: replay a growing prefix of a fixed melody, then check
//! the player's answer
//!
//! State transitions:
//! - IDLE → SHOWING: automatic on the next tick while level < len
//! - SHOWING → SHOWING: one note per tick once the step delay has passed
//! - SHOWING → AWAITING_INPUT: after the last note of the prefix
//! - AWAITING_INPUT → IDLE: prefix entered (level + 1) or wrong button (level 0)
//! - any → IDLE: level reached len, win burst, level 0

use crate::config::DeviceConfig;
use crate::core::FeedbackPatterns;
use crate::types::{ButtonEvent, GameEvent, GameMode, GameSnapshot, GameUpdate, ReasonCode};

/// Game state machine
#[derive(Debug, Clone)]
pub struct SequenceGameController {
    sequence: Vec<u8>,
    /// Index of the last note of the prefix in play (prefix length - 1)
    level: usize,
    /// Progress through the current presentation or answer
    step: usize,
    mode: GameMode,
    step_delay_ms: u64,
    note_ms: u64,
    /// When the previous presented note finished
    last_action_ms: Option<u64>,
    patterns: FeedbackPatterns,
    wins: u64,
    fails: u64,
}

impl Default for SequenceGameController {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}

impl SequenceGameController {
    /// Game at level 0 over the configured melody
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            sequence: config.melody.clone(),
            level: 0,
            step: 0,
            mode: GameMode::Idle,
            step_delay_ms: config.step_delay_ms,
            note_ms: config.note_duration_ms,
            last_action_ms: None,
            patterns: FeedbackPatterns::new(config),
            wins: 0,
            fails: 0,
        }
    }

    /// Advance presentation; called once per control-loop tick
    pub fn tick(&mut self, now_ms: u64) -> GameUpdate {
        if self.level >= self.sequence.len() {
            log::info!("sequence complete, you win");
            self.wins += 1;
            self.reset();
            return GameUpdate::new(GameEvent::Won, ReasonCode::R008_GAME_WON)
                .with_feedback(self.patterns.win());
        }

        let mut started = false;
        if self.mode == GameMode::Idle {
            self.mode = GameMode::Showing;
            self.step = 0;
            started = true;
            log::info!("turn {}", self.level + 1);
        }

        if self.mode == GameMode::Showing && self.step_due(now_ms) {
            if self.step <= self.level {
                let step = self.step;
                let note = self.sequence[step];
                self.step += 1;
                self.last_action_ms = Some(now_ms + self.note_ms);
                log::debug!("presenting step {} note {}", step, note);
                return GameUpdate::new(
                    GameEvent::NotePresented { step, note },
                    ReasonCode::R006_NOTE_PRESENTED,
                )
                .with_feedback(self.patterns.note(note));
            }
            self.mode = GameMode::AwaitingInput;
            self.step = 0;
            log::info!("your turn");
            return GameUpdate::new(GameEvent::AwaitingInput, ReasonCode::R006_AWAITING_INPUT);
        }

        if started {
            GameUpdate::new(GameEvent::TurnStarted { level: self.level }, ReasonCode::R006_TURN_STARTED)
        } else {
            GameUpdate::new(GameEvent::None, ReasonCode::R006_GAME_WAITING)
        }
    }

    /// Judge one button press
    pub fn accept_input(&mut self, event: ButtonEvent) -> GameUpdate {
        if self.mode != GameMode::AwaitingInput {
            return GameUpdate::new(GameEvent::InputIgnored, ReasonCode::R007_INPUT_IGNORED);
        }

        let expected = self.sequence[self.step];
        if event.note() != expected {
            log::info!("wrong: pressed {} expected {}, restarting", event.note(), expected);
            self.fails += 1;
            self.reset();
            return GameUpdate::new(GameEvent::Failed, ReasonCode::R007_INPUT_WRONG)
                .with_feedback(self.patterns.fail());
        }

        let step = self.step;
        self.step += 1;
        if self.step > self.level {
            self.level += 1;
            self.mode = GameMode::Idle;
            log::info!("correct, next level {}", self.level + 1);
            return GameUpdate::new(
                GameEvent::LevelComplete { level: self.level },
                ReasonCode::R007_LEVEL_COMPLETE,
            )
            .with_feedback(self.patterns.level_pause());
        }
        log::debug!("correct");
        GameUpdate::new(GameEvent::Correct { step }, ReasonCode::R007_INPUT_CORRECT)
    }

    fn step_due(&self, now_ms: u64) -> bool {
        self.last_action_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > self.step_delay_ms)
    }

    /// Back to level 0, Idle
    pub fn reset(&mut self) {
        self.level = 0;
        self.step = 0;
        self.mode = GameMode::Idle;
    }

    /// True while the player owes a press
    pub fn is_awaiting_input(&self) -> bool {
        self.mode == GameMode::AwaitingInput
    }

    /// Current level (0-based)
    pub fn level(&self) -> usize {
        self.level
    }

    /// Position within the current turn
    pub fn step(&self) -> usize {
        self.step
    }

    /// Current mode
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The full melody
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Note the player must press next, when answering
    pub fn expected_note(&self) -> Option<u8> {
        if self.is_awaiting_input() {
            self.sequence.get(self.step).copied()
        } else {
            None
        }
    }

    /// Completed games
    pub fn wins(&self) -> u64 {
        self.wins
    }

    /// Wrong presses
    pub fn fails(&self) -> u64 {
        self.fails
    }

    /// Level, step and mode in one value
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            level: self.level,
            step: self.step,
            mode: self.mode,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackKind;

    fn press(game: &mut SequenceGameController, note: u8) -> GameUpdate {
        game.accept_input(ButtonEvent::new(note as usize - 1))
    }

    /// Tick until the game asks for input, returning the presented notes
    fn present(game: &mut SequenceGameController, now: &mut u64) -> Vec<u8> {
        let mut notes = Vec::new();
        for _ in 0..1000 {
            *now += 50;
            match game.tick(*now).event {
                GameEvent::NotePresented { note, .. } => notes.push(note),
                GameEvent::AwaitingInput => return notes,
                _ => {}
            }
        }
        panic!("game never asked for input");
    }

    #[test]
    fn test_initial_state_is_idle() {
        let game = SequenceGameController::default();
        assert_eq!(game.mode(), GameMode::Idle);
        assert_eq!(game.level(), 0);
    }

    #[test]
    fn test_first_tick_starts_showing_and_presents() {
        let mut game = SequenceGameController::default();
        let update = game.tick(0);
        assert_eq!(update.event, GameEvent::NotePresented { step: 0, note: 3 });
        assert_eq!(update.feedback.map(|f| f.kind), Some(FeedbackKind::Note));
        assert_eq!(game.mode(), GameMode::Showing);
    }

    #[test]
    fn test_step_delay_respected() {
        let mut game = SequenceGameController::default();
        game.tick(0); // note ends at 300
        assert_eq!(game.tick(1100).event, GameEvent::None);
        assert_eq!(game.tick(1101).event, GameEvent::AwaitingInput);
    }

    #[test]
    fn test_input_ignored_while_showing() {
        let mut game = SequenceGameController::default();
        game.tick(0);
        let update = press(&mut game, 3);
        assert_eq!(update.event, GameEvent::InputIgnored);
        assert_eq!(game.level(), 0);
    }

    #[test]
    fn test_correct_answer_levels_up() {
        let mut game = SequenceGameController::default();
        let mut now = 0;
        assert_eq!(present(&mut game, &mut now), vec![3]);
        let update = press(&mut game, 3);
        assert_eq!(update.event, GameEvent::LevelComplete { level: 1 });
        assert_eq!(update.feedback.map(|f| f.kind), Some(FeedbackKind::LevelPause));
        assert_eq!(game.mode(), GameMode::Idle);
        assert_eq!(present(&mut game, &mut now), vec![3, 3]);
    }

    #[test]
    fn test_partial_answer_is_correct_not_complete() {
        let mut game = SequenceGameController::default();
        let mut now = 0;
        present(&mut game, &mut now);
        press(&mut game, 3);
        present(&mut game, &mut now);
        assert_eq!(press(&mut game, 3).event, GameEvent::Correct { step: 0 });
        assert_eq!(game.expected_note(), Some(3));
    }

    #[test]
    fn test_wrong_answer_resets() {
        let mut game = SequenceGameController::default();
        let mut now = 0;
        present(&mut game, &mut now);
        let update = press(&mut game, 1);
        assert_eq!(update.event, GameEvent::Failed);
        assert_eq!(update.feedback.map(|f| f.kind), Some(FeedbackKind::Fail));
        assert_eq!(game.snapshot(), GameSnapshot { level: 0, step: 0, mode: GameMode::Idle });
        assert_eq!(game.fails(), 1);
    }

    #[test]
    fn test_short_sequence_wins_and_rearms() {
        let config = DeviceConfig {
            melody: vec![1, 2],
            ..DeviceConfig::default()
        };
        let mut game = SequenceGameController::new(&config);
        let mut now = 0;
        present(&mut game, &mut now);
        press(&mut game, 1);
        present(&mut game, &mut now);
        press(&mut game, 1);
        press(&mut game, 2);
        assert_eq!(game.level(), 2);

        let update = game.tick(now + 50);
        assert_eq!(update.event, GameEvent::Won);
        assert_eq!(update.feedback.map(|f| f.kind), Some(FeedbackKind::Win));
        assert_eq!(game.level(), 0);
        assert_eq!(game.mode(), GameMode::Idle);
        assert_eq!(game.wins(), 1);
    }
}
