use std::time::{Duration, Instant};

pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    pub fn starting_at(fps: u32, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next: start,
        }
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }

    // True at most once per call when a frame is owed. A loop that fell more
    // than three frames behind skips ahead instead of replaying them.
    pub fn due_at(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if now > self.next + self.interval * 3 {
            tracing::debug!(behind = ?(now - self.next), "frame schedule rebased");
            self.next = now + self.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_immediate() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(60, start);
        assert_eq!(ticker.remaining_at(start), Duration::ZERO);
        assert!(ticker.due_at(start));
        assert!(!ticker.due_at(start));
    }

    #[test]
    fn frames_follow_the_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(50, start);
        assert_eq!(ticker.interval(), Duration::from_millis(20));
        assert!(ticker.due_at(start));
        assert_eq!(ticker.remaining_at(start + Duration::from_millis(5)), Duration::from_millis(15));
        assert!(!ticker.due_at(start + Duration::from_millis(19)));
        assert!(ticker.due_at(start + Duration::from_millis(20)));
    }

    #[test]
    fn small_lag_is_caught_up() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(50, start);
        let late = start + Duration::from_millis(45);
        assert!(ticker.due_at(late));
        assert!(ticker.due_at(late));
        assert!(ticker.due_at(late));
        assert!(!ticker.due_at(late));
    }

    #[test]
    fn long_stall_is_skipped() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(50, start);
        let stalled = start + Duration::from_secs(2);
        assert!(ticker.due_at(stalled));
        assert!(!ticker.due_at(stalled));
        assert_eq!(ticker.remaining_at(stalled), Duration::from_millis(20));
    }

    #[test]
    fn zero_fps_is_clamped() {
        let ticker = Ticker::new(0);
        assert_eq!(ticker.interval(), Duration::from_secs(1));
    }
}
