//! Integration tests for the companion side
//!
//! Conditioner decisions driving the slideshow, directly and through the
//! async pipeline with a live line transport.

use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use presencebox::config::{Config, SlideshowConfig};
use presencebox::core::{run_pipeline, PipelineEvent, SignalConditioner, SlideshowDriver};
use presencebox::types::Decision;

fn images() -> Vec<&'static str> {
    vec!["one.png", "two.png", "three.png"]
}

// =============================================================================
// CONDITIONER → SLIDESHOW
// =============================================================================

#[test]
fn test_session_shows_and_keeps_image() {
    let mut conditioner = SignalConditioner::default();
    let mut slideshow = SlideshowDriver::new(images(), &SlideshowConfig { interval_ms: 1000 });

    let mut now = 0;
    let mut feed = |value: f64, count: usize, c: &mut SignalConditioner, s: &mut SlideshowDriver<&'static str>| {
        for _ in 0..count {
            let out = c.ingest(&format!("A: 9.00 cm | B: {:.2} cm", value), now);
            s.apply(out.decision, now);
            s.tick(now);
            now += 100;
        }
    };

    // Hand present for 2.5 s: starts, advances twice
    feed(1.0, 25, &mut conditioner, &mut slideshow);
    assert!(slideshow.is_running());
    assert_eq!(slideshow.current(), Some(&"three.png"));

    // Hand gone: stops, image stays
    feed(9.0, 20, &mut conditioner, &mut slideshow);
    assert!(!slideshow.is_running());
    assert_eq!(slideshow.current(), Some(&"three.png"));

    // Back again: restarts from the first image
    feed(1.0, 10, &mut conditioner, &mut slideshow);
    assert!(slideshow.is_running());
    assert_eq!(slideshow.current(), Some(&"one.png"));
}

#[test]
fn test_repeated_decisions_are_idempotent() {
    let mut slideshow = SlideshowDriver::new(images(), &SlideshowConfig { interval_ms: 1000 });
    slideshow.apply(Decision::Stop, 0);
    assert_eq!(slideshow.current(), None);
    slideshow.apply(Decision::Start, 0);
    slideshow.tick(1000);
    slideshow.apply(Decision::Start, 1100);
    assert_eq!(slideshow.current(), Some(&"two.png"));
    slideshow.apply(Decision::Stop, 1200);
    slideshow.apply(Decision::Stop, 1300);
    assert_eq!(slideshow.current(), Some(&"two.png"));
}

// =============================================================================
// ASYNC PIPELINE
// =============================================================================

#[tokio::test]
async fn test_pipeline_starts_then_clears_on_disconnect() {
    let (mut device, host) = tokio::io::duplex(1024);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let pipeline = tokio::spawn(run_pipeline(
        BufReader::new(host),
        Config::default(),
        images(),
        tx,
    ));

    // A hand held close for ~600 ms, one line every 60 ms
    for _ in 0..10 {
        device.write_all(b"A: 9.00 cm | B: 1.00 cm\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    drop(device);

    let summary = pipeline.await.unwrap().unwrap();
    assert_eq!(summary.lines_seen, 10);
    assert_eq!(summary.starts, 1);
    assert_eq!(summary.stops, 0);
    assert!(summary.images_shown >= 1);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(events.contains(&PipelineEvent::Showing { index: 0, image: "one.png" }));
    assert_eq!(events.last(), Some(&PipelineEvent::Cleared));
}

#[tokio::test]
async fn test_pipeline_with_no_images_is_inert() {
    let (mut device, host) = tokio::io::duplex(1024);
    let (tx, mut rx) = mpsc::unbounded_channel::<PipelineEvent<String>>();
    let pipeline = tokio::spawn(run_pipeline(BufReader::new(host), Config::default(), Vec::new(), tx));

    for _ in 0..8 {
        device.write_all(b"B: 1.0\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    drop(device);

    let summary = pipeline.await.unwrap().unwrap();
    assert_eq!(summary.starts, 1);
    assert_eq!(summary.images_shown, 0);
    let mut showing = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, PipelineEvent::Showing { .. }) {
            showing += 1;
        }
    }
    assert_eq!(showing, 0);
}
