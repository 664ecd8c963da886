//! Slideshow driver: consumes Start/Stop and advances through a fixed image set
//!
//! Stop halts advancement but leaves the current image on screen. Only a
//! disconnect clears it. Repeated Start or Stop calls are no-ops.

use crate::config::SlideshowConfig;
use crate::types::Decision;

/// Timer-driven slideshow over images of type `I`
#[derive(Debug, Clone)]
pub struct SlideshowDriver<I> {
    images: Vec<I>,
    interval_ms: u64,
    index: Option<usize>,
    running: bool,
    last_advance_ms: u64,
}

impl<I> SlideshowDriver<I> {
    /// Stopped driver over `images`, advancing every `interval_ms`
    pub fn new(images: Vec<I>, config: &SlideshowConfig) -> Self {
        Self {
            images,
            interval_ms: config.interval_ms.max(1),
            index: None,
            running: false,
            last_advance_ms: 0,
        }
    }

    /// Show the first image and begin advancing
    ///
    /// An empty image set stays inert.
    pub fn on_start(&mut self, now_ms: u64) {
        if self.running {
            log::debug!("slideshow already running");
            return;
        }
        if self.images.is_empty() {
            log::debug!("slideshow start with no images");
            return;
        }
        self.index = Some(0);
        self.running = true;
        self.last_advance_ms = now_ms;
        log::info!("slideshow started ({} images)", self.images.len());
    }

    /// Halt advancement, keep the current image
    pub fn on_stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("slideshow stopped on image {:?}", self.index);
    }

    /// Apply a conditioner decision
    pub fn apply(&mut self, decision: Decision, now_ms: u64) {
        match decision {
            Decision::Start => self.on_start(now_ms),
            Decision::Stop => self.on_stop(),
            Decision::NoChange => {}
        }
    }

    /// Advance when the interval has elapsed; returns the new image if it changed
    pub fn tick(&mut self, now_ms: u64) -> Option<&I> {
        if !self.running || now_ms.saturating_sub(self.last_advance_ms) < self.interval_ms {
            return None;
        }
        let next = self.index.map_or(0, |i| (i + 1) % self.images.len());
        self.index = Some(next);
        self.last_advance_ms = now_ms;
        self.images.get(next)
    }

    /// Transport lost: stop and blank the screen
    pub fn disconnect(&mut self) {
        self.running = false;
        self.index = None;
        log::info!("slideshow cleared on disconnect");
    }

    /// Image currently on screen
    pub fn current(&self) -> Option<&I> {
        self.index.and_then(|i| self.images.get(i))
    }

    /// Index of the image on screen
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// True between Start and Stop
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True when there are no images
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(n: usize) -> SlideshowDriver<String> {
        let images = (0..n).map(|i| format!("img{}.png", i)).collect();
        SlideshowDriver::new(images, &SlideshowConfig { interval_ms: 1000 })
    }

    #[test]
    fn test_start_shows_first_image() {
        let mut s = driver(3);
        assert_eq!(s.current(), None);
        s.on_start(0);
        assert_eq!(s.current().map(String::as_str), Some("img0.png"));
    }

    #[test]
    fn test_advances_and_wraps() {
        let mut s = driver(2);
        s.on_start(0);
        assert_eq!(s.tick(999), None);
        assert_eq!(s.tick(1000).map(String::as_str), Some("img1.png"));
        assert_eq!(s.tick(2000).map(String::as_str), Some("img0.png"));
    }

    #[test]
    fn test_stop_keeps_last_image() {
        let mut s = driver(3);
        s.on_start(0);
        s.tick(1000);
        s.on_stop();
        assert_eq!(s.tick(5000), None);
        assert_eq!(s.current().map(String::as_str), Some("img1.png"));
    }

    #[test]
    fn test_duplicate_start_is_noop() {
        let mut s = driver(3);
        s.on_start(0);
        s.tick(1000);
        s.on_start(1500);
        assert_eq!(s.current_index(), Some(1));
        // Interval not reset by the duplicate
        assert!(s.tick(2000).is_some());
    }

    #[test]
    fn test_empty_set_is_inert() {
        let mut s = driver(0);
        s.on_start(0);
        assert!(!s.is_running());
        assert_eq!(s.tick(10_000), None);
        assert_eq!(s.current(), None);
    }

    #[test]
    fn test_disconnect_clears() {
        let mut s = driver(2);
        s.apply(Decision::Start, 0);
        s.apply(Decision::Stop, 10);
        assert!(s.current().is_some());
        s.disconnect();
        assert_eq!(s.current(), None);
    }
}
