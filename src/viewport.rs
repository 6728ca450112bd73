//! Debounced viewport probing for compact-layout detection.

use std::time::{Duration, Instant};

/// Width below which the compact layout applies.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Quiet period after the last resize event before the probe commits.
pub const RESIZE_QUIET_PERIOD: Duration = Duration::from_millis(100);

/// Cancel-and-reschedule debouncer.
///
/// Every [`Debouncer::submit`] replaces the pending value and pushes the
/// deadline out by the quiet period; [`Debouncer::poll`] yields the value
/// once the deadline has passed. Callers drive time explicitly, so hosts
/// with their own schedulers (and tests) need no real timers.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// Schedule `value`, displacing any not-yet-fired value.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Deadline of the pending value, for hosts that schedule wakeups.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Debounced "is the viewport narrow" probe.
///
/// The first observed width applies immediately; later observations are
/// debounced so a burst of resize events collapses into one state change.
#[derive(Debug)]
pub struct MobileProbe {
    breakpoint: u32,
    is_mobile: Option<bool>,
    debouncer: Debouncer<u32>,
}

impl MobileProbe {
    pub fn new() -> Self {
        Self::with_breakpoint(MOBILE_BREAKPOINT)
    }

    pub fn with_breakpoint(breakpoint: u32) -> Self {
        Self {
            breakpoint,
            is_mobile: None,
            debouncer: Debouncer::new(RESIZE_QUIET_PERIOD),
        }
    }

    /// Feed one viewport width observation.
    pub fn observe(&mut self, width: u32, now: Instant) {
        if self.is_mobile.is_none() {
            self.is_mobile = Some(width < self.breakpoint);
        } else {
            self.debouncer.submit(width, now);
        }
    }

    /// Commit any debounced observation and return the current state.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(width) = self.debouncer.poll(now) {
            self.is_mobile = Some(width < self.breakpoint);
        }
        self.is_mobile()
    }

    /// Current state; `false` until the first observation.
    pub fn is_mobile(&self) -> bool {
        self.is_mobile.unwrap_or(false)
    }
}

impl Default for MobileProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();

        debouncer.submit(1, t0);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(50)), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(100)), Some(1));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_debouncer_reschedules_on_new_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();

        debouncer.submit(1, t0);
        debouncer.submit(2, t0 + Duration::from_millis(80));

        // The first value's deadline has passed, but it was displaced.
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(120)), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(180)), Some(2));
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();

        debouncer.submit(7, t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_probe_applies_first_observation_immediately() {
        let mut probe = MobileProbe::new();
        assert!(!probe.is_mobile());

        probe.observe(500, Instant::now());
        assert!(probe.is_mobile());
    }

    #[test]
    fn test_probe_collapses_resize_burst() {
        let mut probe = MobileProbe::new();
        let t0 = Instant::now();

        probe.observe(1200, t0);
        assert!(!probe.is_mobile());

        probe.observe(900, t0 + Duration::from_millis(10));
        probe.observe(700, t0 + Duration::from_millis(20));
        probe.observe(400, t0 + Duration::from_millis(30));

        // Still quiet-period pending.
        assert!(!probe.poll(t0 + Duration::from_millis(60)));
        // Only the last width in the burst lands.
        assert!(probe.poll(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_breakpoint_is_strictly_less_than() {
        let mut probe = MobileProbe::new();
        probe.observe(MOBILE_BREAKPOINT, Instant::now());
        assert!(!probe.is_mobile());

        let mut narrow = MobileProbe::new();
        narrow.observe(MOBILE_BREAKPOINT - 1, Instant::now());
        assert!(narrow.is_mobile());
    }
}
