//! Core modules for Presencebox

pub mod sampler;
pub mod presence;
pub mod breathing;
pub mod scheduler;
pub mod patterns;
pub mod game;
pub mod buttons;
pub mod device;
pub mod line_parser;
pub mod conditioner;
pub mod slideshow;
pub mod pipeline;

pub use sampler::{DistanceSampler, ScriptedSampler, WaveSampler, echo_to_distance};
pub use presence::PresenceGate;
pub use breathing::{BreathingEffectEngine, BreathingCommand, BreathingFrame, rainbow_static, hsv_to_rgb, color_wheel};
pub use scheduler::FeedbackScheduler;
pub use patterns::FeedbackPatterns;
pub use game::SequenceGameController;
pub use buttons::{ButtonInputManager, ButtonScan};
pub use device::{DeviceLoop, FeedbackSink, PanelState, TickReport, format_telemetry};
pub use line_parser::{LineParser, ParsedLine};
pub use conditioner::{SignalConditioner, Smoother, HysteresisTimer};
pub use slideshow::SlideshowDriver;
pub use pipeline::{run_pipeline, PipelineEvent, PipelineSummary};
