//! Leading + trailing edge debouncer.
//!
//! The first value of a burst is delivered immediately and opens a quiet
//! window. Values arriving inside the window replace each other; when the
//! window closes the most recent one is delivered and a new window opens
//! behind it. Values in between are dropped.
//!
//! The debouncer owns no timer. Callers pass the current [`Instant`] into
//! every operation and ask [`Debouncer::deadline`] when to call
//! [`Debouncer::poll`] next, which keeps it deterministic under test and
//! leaves nothing behind after [`Debouncer::cancel`].

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: Duration,
    /// End of the current quiet window; `None` when idle.
    window_ends: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_ends: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a value. Returns it straight back when it should be delivered
    /// now (leading edge); otherwise it is held as the pending value.
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        self.poll_window(now);
        if self.window_ends.is_some() {
            self.pending = Some(value);
            return None;
        }
        self.window_ends = Some(now + self.interval);
        Some(value)
    }

    /// Advance time. Returns the trailing value once the window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ends = self.window_ends?;
        if now < ends {
            return None;
        }
        match self.pending.take() {
            Some(value) => {
                // Delivering the trailing value counts as a fresh call.
                self.window_ends = Some(now + self.interval);
                Some(value)
            }
            None => {
                self.window_ends = None;
                None
            }
        }
    }

    /// When `poll` next has something to do.
    pub fn deadline(&self) -> Option<Instant> {
        self.window_ends
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value and close the window.
    pub fn cancel(&mut self) {
        self.window_ends = None;
        self.pending = None;
    }

    /// Close an expired window that has nothing pending, so a late call
    /// fires on the leading edge instead of being held.
    fn poll_window(&mut self, now: Instant) {
        if let Some(ends) = self.window_ends
            && now >= ends
            && self.pending.is_none()
        {
            self.window_ends = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Feed `(offset_ms, value)` calls, polling at every deadline, and
    /// collect everything delivered.
    fn drive(interval: u64, calls: &[(u64, u32)], until: u64) -> Vec<(u64, u32)> {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(interval));
        let mut out = Vec::new();
        for &(at, value) in calls {
            while let Some(deadline) = d.deadline()
                && deadline <= t0 + ms(at)
            {
                let elapsed = (deadline - t0).as_millis() as u64;
                if let Some(v) = d.poll(deadline) {
                    out.push((elapsed, v));
                }
            }
            if let Some(v) = d.call(t0 + ms(at), value) {
                out.push((at, v));
            }
        }
        while let Some(deadline) = d.deadline()
            && deadline <= t0 + ms(until)
        {
            let elapsed = (deadline - t0).as_millis() as u64;
            if let Some(v) = d.poll(deadline) {
                out.push((elapsed, v));
            }
        }
        out
    }

    #[test]
    fn first_call_fires_immediately() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        assert_eq!(d.call(t0, 1), Some(1));
        assert_eq!(d.deadline(), Some(t0 + ms(500)));
    }

    #[test]
    fn burst_delivers_first_and_last_only() {
        let out = drive(500, &[(0, 1), (20, 2), (40, 3), (60, 4), (80, 5)], 5_000);
        assert_eq!(out, vec![(0, 1), (500, 5)]);
    }

    #[test]
    fn nothing_pending_closes_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.call(t0, 1);
        assert_eq!(d.poll(t0 + ms(500)), None);
        assert_eq!(d.deadline(), None);
        // Next call is a new leading edge.
        assert_eq!(d.call(t0 + ms(900), 2), Some(2));
    }

    #[test]
    fn poll_before_deadline_is_noop() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.call(t0, 1);
        d.call(t0 + ms(10), 2);
        assert_eq!(d.poll(t0 + ms(499)), None);
        assert!(d.has_pending());
    }

    #[test]
    fn trailing_delivery_opens_new_window() {
        // Steady stream every 250ms: one delivery per 500ms window. A value
        // arriving exactly at a deadline lands in the next window.
        let calls: Vec<(u64, u32)> = (0..8).map(|i| (i * 250, i as u32)).collect();
        let out = drive(500, &calls, 5_000);
        assert_eq!(out, vec![(0, 0), (500, 1), (1000, 3), (1500, 5), (2000, 7)]);
    }

    #[test]
    fn zero_is_a_deliverable_value() {
        let out = drive(500, &[(0, 7), (100, 0)], 5_000);
        assert_eq!(out, vec![(0, 7), (500, 0)]);
    }

    #[test]
    fn late_call_after_unpolled_empty_window_fires_immediately() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.call(t0, 1);
        assert_eq!(d.call(t0 + ms(2_000), 2), Some(2));
    }

    #[test]
    fn cancel_drops_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.call(t0, 1);
        d.call(t0 + ms(10), 2);
        d.cancel();
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(t0 + ms(500)), None);
        assert!(!d.has_pending());
    }
}
