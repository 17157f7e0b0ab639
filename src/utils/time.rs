use crate::config::constants::timing::NANOSECONDS_PER_SECOND;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now_nanos(&self) -> u64;
    fn now_micros(&self) -> u64 {
        self.now_nanos() / 1000
    }
}

/// System time provider using actual system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_nanos(&self) -> u64 {
        current_timestamp_nanos()
    }
}

/// Mock time provider for deterministic testing
#[derive(Debug)]
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_nanos: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_nanos),
        }
    }

    pub fn advance_by(&self, nanos: u64) {
        self.current_time.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn set_time(&self, nanos: u64) {
        self.current_time.store(nanos, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_nanos(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Nanoseconds since the Unix epoch
pub fn current_timestamp_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

pub fn current_timestamp_micros() -> u64 {
    current_timestamp_nanos() / 1000
}

/// Nominal sample period for a sampling rate. A zero rate yields a zero period.
pub fn calculate_sample_period_nanos(sampling_rate_hz: u32) -> u64 {
    if sampling_rate_hz == 0 {
        return 0;
    }
    NANOSECONDS_PER_SECOND / sampling_rate_hz as u64
}

/// Evenly spaced acquisition timestamps starting at `start_nanos`
pub fn sample_timestamps(start_nanos: u64, sampling_rate_hz: u32, count: usize) -> Vec<u64> {
    let period = calculate_sample_period_nanos(sampling_rate_hz);
    (0..count as u64)
        .map(|i| start_nanos.saturating_add(i.saturating_mul(period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_period() {
        assert_eq!(calculate_sample_period_nanos(1000), 1_000_000);
        assert_eq!(calculate_sample_period_nanos(10), 100_000_000);
        assert_eq!(calculate_sample_period_nanos(0), 0);
    }

    #[test]
    fn test_sample_timestamps_are_monotonic() {
        let ts = sample_timestamps(5_000, 1000, 4);
        assert_eq!(ts, vec![5_000, 1_005_000, 2_005_000, 3_005_000]);
    }

    #[test]
    fn test_mock_time_provider() {
        let clock = MockTimeProvider::new(100);
        assert_eq!(clock.now_nanos(), 100);
        clock.advance_by(50);
        assert_eq!(clock.now_nanos(), 150);
        clock.set_time(2_000);
        assert_eq!(clock.now_micros(), 2);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let t1 = current_timestamp_nanos();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let t2 = current_timestamp_nanos();
        assert!(t2 > t1);
    }
}
