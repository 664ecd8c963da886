//! Companion pipeline: line source → conditioner → slideshow
//!
//! Three stages, single writer each:
//! - reader task: splits the transport into lines
//! - conditioner task: owns the smoothing buffer and hysteresis state
//! - display context (the caller's task): owns the slideshow; Start/Stop
//!   are marshalled onto it over a channel
//!
//! End of stream counts as a disconnect and clears the shown image.

use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::Config;
use crate::core::{SignalConditioner, SlideshowDriver};
use crate::error::{Error, Result};
use crate::types::{ConditionerOutput, Decision};

/// Lines buffered between reader and conditioner
const LINE_QUEUE: usize = 64;

/// Decisions buffered between conditioner and display
const COMMAND_QUEUE: usize = 8;

/// How often the display context checks for slide advancement
const SLIDE_POLL_MS: u64 = 50;

/// Progress reported to whoever watches the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent<I> {
    /// One line went through the conditioner
    Output(ConditionerOutput),
    /// A new image is on screen
    Showing { index: usize, image: I },
    /// Transport ended, screen blanked
    Cleared,
}

/// Totals once the transport closes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub lines_seen: u64,
    pub lines_dropped: u64,
    pub starts: u64,
    pub stops: u64,
    pub images_shown: u64,
}

/// Run until the line source is exhausted
pub async fn run_pipeline<R, I>(
    reader: R,
    config: Config,
    images: Vec<I>,
    events: mpsc::UnboundedSender<PipelineEvent<I>>,
) -> Result<PipelineSummary>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    I: Clone + Send + 'static,
{
    let start = Instant::now();
    let (line_tx, mut line_rx) = mpsc::channel::<String>(LINE_QUEUE);
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Decision>(COMMAND_QUEUE);

    let reader_task = tokio::spawn(read_lines(reader, line_tx));

    let conditioner_events = events.clone();
    let conditioner_config = config.conditioner.clone();
    let conditioner_task = tokio::spawn(async move {
        let mut conditioner = SignalConditioner::new(&conditioner_config);
        while let Some(line) = line_rx.recv().await {
            let output = conditioner.ingest(&line, elapsed_ms(start));
            let decision = output.decision;
            let _ = conditioner_events.send(PipelineEvent::Output(output));
            if decision.is_transition() && cmd_tx.send(decision).await.is_err() {
                break;
            }
        }
        (conditioner.lines_seen(), conditioner.lines_dropped())
    });

    let mut summary = PipelineSummary::default();
    let mut slideshow = SlideshowDriver::new(images, &config.slideshow);
    let mut poll = tokio::time::interval(Duration::from_millis(SLIDE_POLL_MS));
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(decision) = cmd else { break };
                match decision {
                    Decision::Start => summary.starts += 1,
                    Decision::Stop => summary.stops += 1,
                    Decision::NoChange => {}
                }
                let was_running = slideshow.is_running();
                slideshow.apply(decision, elapsed_ms(start));
                if !was_running && slideshow.is_running() {
                    announce(&slideshow, &events, &mut summary);
                }
            }
            _ = poll.tick() => {
                if slideshow.tick(elapsed_ms(start)).is_some() {
                    announce(&slideshow, &events, &mut summary);
                }
            }
        }
    }

    slideshow.disconnect();
    let _ = events.send(PipelineEvent::Cleared);

    let (lines_seen, lines_dropped) = conditioner_task.await.map_err(join_error)?;
    summary.lines_seen = lines_seen;
    summary.lines_dropped = lines_dropped;
    reader_task.await.map_err(join_error)??;

    log::info!(
        "transport closed: {} lines ({} dropped), {} starts, {} stops",
        summary.lines_seen,
        summary.lines_dropped,
        summary.starts,
        summary.stops
    );
    Ok(summary)
}

/// Split the transport into lines; invalid UTF-8 is replaced, not fatal
async fn read_lines<R: AsyncBufRead + Unpin>(mut reader: R, tx: mpsc::Sender<String>) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf).trim_end_matches(['\r', '\n']).to_string();
        if tx.send(line).await.is_err() {
            return Ok(());
        }
    }
}

fn announce<I: Clone>(
    slideshow: &SlideshowDriver<I>,
    events: &mpsc::UnboundedSender<PipelineEvent<I>>,
    summary: &mut PipelineSummary,
) {
    if let (Some(index), Some(image)) = (slideshow.current_index(), slideshow.current()) {
        summary.images_shown += 1;
        let _ = events.send(PipelineEvent::Showing {
            index,
            image: image.clone(),
        });
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(e))
}

// =============================================================================
// TESTS
// =============================================================================
