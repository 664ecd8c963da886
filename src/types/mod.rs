//! Core types for Presencebox

mod sample;
mod color;
mod feedback;
mod game;
mod decision;
mod reason;
mod output;

pub use sample::DistanceSample;
pub use color::{Rgb, Hsv};
pub use feedback::{FeedbackAction, FeedbackStep, FeedbackSequence, FeedbackKind, Region};
pub use game::{GameMode, ButtonEvent, GameSnapshot, GameUpdate, GameEvent};
pub use decision::Decision;
pub use reason::ReasonCode;
pub use output::ConditionerOutput;
