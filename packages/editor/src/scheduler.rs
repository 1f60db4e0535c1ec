//! # Preview scheduling
//!
//! [`PreviewScheduler`] turns a stream of edits into preview passes:
//!
//! 1. Every edit requests a pass for the document generation it produced.
//! 2. Requests closer together than the quiet window collapse into one.
//! 3. The pass starts on the next frame boundary after the window closes.
//! 4. At most one pass is in flight. A pass that finishes after a newer
//!    generation was requested is stale and must not be rendered.
//!
//! The scheduler never reads the clock itself; callers pass `now`, which keeps
//! it deterministic under test.

use crate::config::EditorConfig;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Document revision a preview pass was computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Trailing-edge debounce: fires once `delay` after the last `schedule`
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Whether a finished pass may reach the preview surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Render,
    /// A newer generation was requested while this pass ran
    Stale,
}

#[derive(Debug, Clone)]
pub struct PreviewScheduler {
    quiet: Debounce,
    frame: Duration,
    origin: Instant,
    latest: Generation,
    in_flight: Option<Generation>,
    rendered: Option<Generation>,
}

impl PreviewScheduler {
    pub fn new(config: &EditorConfig, now: Instant) -> Self {
        Self::with_timing(config.preview_quiet, config.frame_interval, now)
    }

    pub fn with_timing(quiet: Duration, frame: Duration, now: Instant) -> Self {
        Self {
            quiet: Debounce::new(quiet),
            frame,
            origin: now,
            latest: Generation::default(),
            in_flight: None,
            rendered: None,
        }
    }

    /// Ask for a pass over `generation`. Requests for generations older than
    /// the latest one are ignored.
    pub fn request(&mut self, generation: Generation, now: Instant) {
        if generation < self.latest {
            trace!(%generation, latest = %self.latest, "Ignoring outdated preview request");
            return;
        }
        self.latest = generation;
        self.quiet.schedule(now);
    }

    /// When the next pass may start, if one is wanted and none is in flight
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.in_flight.is_some() {
            return None;
        }
        self.quiet.deadline().map(|deadline| self.align(deadline))
    }

    /// Start a pass if one is due. Returns the generation to compile.
    pub fn poll(&mut self, now: Instant) -> Option<Generation> {
        let due = self.next_deadline()?;
        if due > now {
            return None;
        }

        self.quiet.cancel();
        self.in_flight = Some(self.latest);
        debug!(generation = %self.latest, "Preview pass started");
        Some(self.latest)
    }

    /// Record that the pass over `generation` finished
    pub fn complete(&mut self, generation: Generation) -> Admission {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }

        let newer_rendered = self.rendered.map_or(false, |rendered| rendered > generation);
        if generation < self.latest || newer_rendered {
            debug!(%generation, latest = %self.latest, "Dropping stale preview pass");
            return Admission::Stale;
        }

        self.rendered = Some(generation);
        Admission::Render
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    pub fn rendered(&self) -> Option<Generation> {
        self.rendered
    }

    /// Nothing requested and nothing running
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && !self.quiet.is_pending()
    }

    /// Round `at` up to the next frame boundary
    fn align(&self, at: Instant) -> Instant {
        let frame = self.frame.as_nanos();
        if frame == 0 {
            return at;
        }
        let elapsed = at.saturating_duration_since(self.origin).as_nanos();
        let frames = (elapsed + frame - 1) / frame;
        self.origin + Duration::from_nanos((frames * frame) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(100);
    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_fires_after_last_schedule() {
        let start = Instant::now();
        let mut debounce = Debounce::new(ms(500));

        debounce.schedule(start);
        debounce.schedule(start + ms(300));
        assert!(!debounce.fire(start + ms(500)));
        assert!(debounce.fire(start + ms(800)));
        assert!(!debounce.fire(start + ms(900)));
    }

    #[test]
    fn test_burst_collapses_into_one_pass() {
        let start = Instant::now();
        let mut scheduler = PreviewScheduler::with_timing(QUIET, FRAME, start);

        for (i, offset) in [0, 20, 40, 60].into_iter().enumerate() {
            scheduler.request(Generation(i as u64 + 1), start + ms(offset));
        }

        assert_eq!(scheduler.poll(start + ms(150)), None);
        // 60ms + 100ms quiet = 160ms, which is the tenth frame boundary.
        assert_eq!(scheduler.next_deadline(), Some(start + ms(160)));
        assert_eq!(scheduler.poll(start + ms(160)), Some(Generation(4)));
        assert_eq!(scheduler.poll(start + ms(500)), None);
    }

    #[test]
    fn test_pass_waits_for_frame_boundary() {
        let start = Instant::now();
        let mut scheduler = PreviewScheduler::with_timing(QUIET, FRAME, start);

        scheduler.request(Generation(1), start + ms(5));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(112)));
        assert_eq!(scheduler.poll(start + ms(105)), None);
        assert_eq!(scheduler.poll(start + ms(112)), Some(Generation(1)));
    }

    #[test]
    fn test_one_pass_in_flight_and_stale_results_dropped() {
        let start = Instant::now();
        let mut scheduler = PreviewScheduler::with_timing(QUIET, FRAME, start);

        scheduler.request(Generation(1), start);
        assert_eq!(scheduler.poll(start + ms(112)), Some(Generation(1)));

        scheduler.request(Generation(2), start + ms(120));
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.poll(start + ms(400)), None);

        assert_eq!(scheduler.complete(Generation(1)), Admission::Stale);
        assert_eq!(scheduler.rendered(), None);

        assert_eq!(scheduler.poll(start + ms(400)), Some(Generation(2)));
        assert_eq!(scheduler.complete(Generation(2)), Admission::Render);
        assert_eq!(scheduler.rendered(), Some(Generation(2)));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_outdated_requests_are_ignored() {
        let start = Instant::now();
        let mut scheduler = PreviewScheduler::with_timing(QUIET, FRAME, start);

        scheduler.request(Generation(5), start);
        scheduler.request(Generation(3), start);
        assert_eq!(scheduler.latest(), Generation(5));
    }
}
