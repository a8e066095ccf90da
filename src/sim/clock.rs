//! Stage-owned cadences
//!
//! An [`Interval`] is a plain deadline that lives inside the stage that owns
//! it. Leaving the stage drops the value, so no tick can reach the next stage.

/// One second of timer time
pub const SECOND_MS: f64 = 1000.0;

/// Fixed-period deadline on the host's millisecond clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period_ms: f64,
    next_due_ms: f64,
}

impl Interval {
    /// First tick one period after `start_ms`
    pub fn new(start_ms: f64, period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: start_ms + period_ms,
        }
    }

    /// One-second cadence
    pub fn seconds(start_ms: f64) -> Self {
        Self::new(start_ms, SECOND_MS)
    }

    pub fn next_due(&self) -> f64 {
        self.next_due_ms
    }

    /// If a tick is due at `now_ms`, consume it and return its scheduled time.
    /// Late ticks are delivered one per call, never merged.
    pub fn fire(&mut self, now_ms: f64) -> Option<f64> {
        if now_ms < self.next_due_ms {
            return None;
        }
        let due = self.next_due_ms;
        self.next_due_ms += self.period_ms;
        Some(due)
    }
}

/// What the frame callback tells its host after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Still playing: schedule another frame
    Continue,
    /// Not playing: do not re-arm
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_schedule() {
        let mut clock = Interval::seconds(500.0);
        assert_eq!(clock.fire(1499.0), None);
        assert_eq!(clock.fire(1500.0), Some(1500.0));
        assert_eq!(clock.fire(1500.0), None);
        assert_eq!(clock.next_due(), 2500.0);
    }

    #[test]
    fn test_late_ticks_delivered_one_at_a_time() {
        let mut clock = Interval::seconds(0.0);
        let mut fired = Vec::new();
        while let Some(t) = clock.fire(3200.0) {
            fired.push(t);
        }
        assert_eq!(fired, vec![1000.0, 2000.0, 3000.0]);
    }
}
