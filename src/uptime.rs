//! Uptime tracking for the ping command.

use std::time::{Duration, Instant};

const SECONDS_PER_DAY: u64 = 86_400;

/// Instant the bot session began.
///
/// Set once at startup and copied into each command context; reading it never
/// mutates anything.
#[derive(Debug, Clone, Copy)]
pub struct UptimeClock {
    started_at: Instant,
}

impl UptimeClock {
    /// Starts a clock at the current instant.
    pub fn start() -> Self {
        UptimeClock {
            started_at: Instant::now(),
        }
    }

    /// Creates a clock started at the given instant.
    #[cfg(test)]
    pub fn started_at(started_at: Instant) -> Self {
        UptimeClock { started_at }
    }

    /// Wall-clock duration since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Renders a duration as `H:MM:SS[.ffffff]`, prefixed by `N day(s), ` when it
/// spans at least one day.
///
/// The microsecond part is omitted when it is zero.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// assert_eq!(format_duration(Duration::from_secs(3661)), "1:01:01");
/// assert_eq!(format_duration(Duration::from_micros(1_500_000)), "0:00:01.500000");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let days = total_seconds / SECONDS_PER_DAY;
    let seconds_in_day = total_seconds % SECONDS_PER_DAY;
    let hours = seconds_in_day / 3600;
    let minutes = (seconds_in_day % 3600) / 60;
    let seconds = seconds_in_day % 60;
    let micros = duration.subsec_micros();

    let mut rendered = format!("{}:{:02}:{:02}", hours, minutes, seconds);
    if micros != 0 {
        rendered.push_str(&format!(".{:06}", micros));
    }

    match days {
        0 => rendered,
        1 => format!("1 day, {}", rendered),
        _ => format!("{} days, {}", days, rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_duration(Duration::ZERO), "0:00:00");
    }

    #[test]
    fn test_format_hours_minutes_seconds() {
        assert_eq!(format_duration(Duration::from_secs(3661)), "1:01:01");
        assert_eq!(format_duration(Duration::from_secs(36_000)), "10:00:00");
    }

    #[test]
    fn test_format_microseconds() {
        assert_eq!(
            format_duration(Duration::from_micros(5_000_042)),
            "0:00:05.000042"
        );
    }

    #[test]
    fn test_format_drops_nanoseconds() {
        assert_eq!(format_duration(Duration::from_nanos(999)), "0:00:00");
    }

    #[test]
    fn test_format_one_day() {
        assert_eq!(
            format_duration(Duration::from_secs(SECONDS_PER_DAY + 61)),
            "1 day, 0:01:01"
        );
    }

    #[test]
    fn test_format_several_days() {
        assert_eq!(
            format_duration(Duration::from_secs(3 * SECONDS_PER_DAY + 7200)),
            "3 days, 2:00:00"
        );
    }

    #[test]
    fn test_clock_elapsed_increases() {
        let clock = UptimeClock::start();
        let first = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        let second = clock.elapsed();
        assert!(second > first);
    }

    #[test]
    fn test_clock_started_in_the_past() {
        let started_at = Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap();
        let clock = UptimeClock::started_at(started_at);
        assert!(clock.elapsed() >= Duration::from_secs(120));
    }
}
