use rand::Rng;
use std::time::Duration;

/// Every this many listed repositories the base delay is replaced by a shorter, jittered pause.
pub(crate) const PAUSE_EVERY: usize = 25;
pub(crate) const MAX_CONSECUTIVE_ERRORS: u32 = 3;
const PAUSE_JITTER_MS: u64 = 50;

#[derive(Debug, PartialEq)]
pub(crate) enum Pace {
    Base(Duration),
    Periodic(Duration),
}

#[derive(Debug, PartialEq)]
pub(crate) enum Strike {
    /// Sleep this long on top of the next pacing delay.
    Backoff(Duration),
    /// Consecutive error limit reached.
    Trip(u32),
}

/// Pacing state of one run: the configured delay and the consecutive error counter.
#[derive(Debug)]
pub(crate) struct Throttle {
    delay_ms: u64,
    consecutive_errors: u32,
}

impl Throttle {
    pub(crate) fn new(delay_ms: u64) -> Self {
        Throttle {
            delay_ms,
            consecutive_errors: 0,
        }
    }

    /// Wait to apply before requesting traffic of the repository at `index` of the unfiltered listing.
    pub(crate) fn pace(&self, index: usize) -> Pace {
        if index > 0 && index % PAUSE_EVERY == 0 {
            let jitter = rand::thread_rng().gen_range(0..PAUSE_JITTER_MS);
            Pace::Periodic(self.periodic_pause(jitter))
        } else {
            Pace::Base(Duration::from_millis(self.delay_ms))
        }
    }

    /// Half the delay (rounded up so it never drops below `delay / 2`) plus `jitter`.
    fn periodic_pause(&self, jitter: u64) -> Duration {
        Duration::from_millis((self.delay_ms + 1) / 2 + jitter)
    }

    pub(crate) fn record_success(&mut self) {
        self.consecutive_errors = 0;
    }

    pub(crate) fn record_failure(&mut self) -> Strike {
        self.consecutive_errors += 1;
        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            return Strike::Trip(self.consecutive_errors);
        }
        Strike::Backoff(Duration::from_millis(
            self.delay_ms * 2u64.pow(self.consecutive_errors),
        ))
    }

    #[cfg(test)]
    fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_delay_test() {
        let throttle = Throttle::new(300);
        for index in [0, 1, 24, 26, 49, 51] {
            assert_eq!(throttle.pace(index), Pace::Base(Duration::from_millis(300)));
        }
    }

    #[test]
    fn periodic_pause_test() {
        let throttle = Throttle::new(300);
        for index in [25, 50, 75, 100] {
            match throttle.pace(index) {
                Pace::Periodic(pause) => {
                    let ms = pause.as_millis() as u64;
                    assert!((150..200).contains(&ms), "pause {}ms out of range", ms);
                }
                pace => panic!("Expected periodic pause at {}, got {:?}", index, pace),
            }
        }
    }

    #[test]
    fn periodic_pause_odd_delay_test() {
        let throttle = Throttle::new(101);
        assert_eq!(throttle.periodic_pause(0), Duration::from_millis(51));
        assert_eq!(throttle.periodic_pause(49), Duration::from_millis(100));
    }

    #[test]
    fn exponential_backoff_test() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.record_failure(), Strike::Backoff(Duration::from_millis(200)));
        assert_eq!(throttle.record_failure(), Strike::Backoff(Duration::from_millis(400)));
        assert_eq!(throttle.record_failure(), Strike::Trip(3));
    }

    #[test]
    fn success_resets_counter_test() {
        let mut throttle = Throttle::new(100);
        throttle.record_failure();
        throttle.record_failure();
        assert_eq!(throttle.consecutive_errors(), 2);
        throttle.record_success();
        assert_eq!(throttle.consecutive_errors(), 0);
        assert_eq!(throttle.record_failure(), Strike::Backoff(Duration::from_millis(200)));
    }
}
