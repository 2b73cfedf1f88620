use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Convert a tick count at `timescale` ticks per second into wall-clock time.
///
/// A zero timescale yields [`Duration::ZERO`] rather than dividing by zero.
pub(crate) fn ticks_to_duration(ticks: u64, timescale: u32) -> Duration {
    if timescale == 0 {
        return Duration::ZERO;
    }
    let timescale = timescale as u64;
    Duration::new(ticks / timescale, ((ticks % timescale) * 1_000_000_000 / timescale) as u32)
}

/// Convert wall-clock time into a tick count at `timescale` ticks per second, truncating.
pub(crate) fn duration_to_ticks(duration: Duration, timescale: u32) -> u32 {
    (duration.as_nanos() * timescale as u128 / NANOS_PER_SEC) as u32
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn init_logger() {
        // Ignore errors initializing the logger if tests race to configure it
        let _ignore = env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .is_test(true)
            .try_init();
    }

    #[test]
    fn tick_conversions() {
        assert_eq!(ticks_to_duration(10_000, 1000), Duration::from_secs(10));
        assert_eq!(ticks_to_duration(1500, 1000), Duration::from_millis(1500));
        assert_eq!(ticks_to_duration(1, 90_000), Duration::from_nanos(11_111));
        assert_eq!(ticks_to_duration(123, 0), Duration::ZERO);

        assert_eq!(duration_to_ticks(Duration::from_secs(10), 1000), 10_000);
        assert_eq!(duration_to_ticks(Duration::from_millis(1500), 1000), 1500);
        assert_eq!(duration_to_ticks(Duration::from_secs(2), 90_000), 180_000);
    }

    #[test]
    fn tick_roundtrip_truncates_by_at_most_one() {
        for timescale in [1000u32, 48_000, 90_000] {
            for ticks in [0u64, 1, 999, 1000, 12_345, 90_000] {
                let back = duration_to_ticks(ticks_to_duration(ticks, timescale), timescale) as u64;
                assert!(ticks - back <= 1, "{ticks} ticks @ {timescale} came back as {back}");
            }
        }
    }
}
