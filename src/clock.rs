//! Time string formatting and the once-per-second refresh

use chrono::{DateTime, Local, TimeZone};
use clap::ValueEnum;
use std::fmt;
use std::time::{Duration, Instant};

use crate::constants::clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeFormat {
    #[value(name = "12")]
    H12,
    #[value(name = "24")]
    H24,
}

impl TimeFormat {
    pub fn toggled(self) -> Self {
        match self {
            TimeFormat::H12 => TimeFormat::H24,
            TimeFormat::H24 => TimeFormat::H12,
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            TimeFormat::H12 => clock::FORMAT_12H,
            TimeFormat::H24 => clock::FORMAT_24H,
        }
    }

    pub fn format<Tz: TimeZone>(self, time: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        time.format(self.pattern()).to_string()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H12 => write!(f, "12-hour"),
            TimeFormat::H24 => write!(f, "24-hour"),
        }
    }
}

pub fn now_string(format: TimeFormat) -> String {
    format.format(&Local::now())
}

/// Fires at most once per tick period
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_millis(clock::TICK_MS))
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// True on the first call and whenever a full period has passed since the last tick
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left until the next tick is due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last
            .map(|last| self.period.saturating_sub(now.duration_since(last)))
            .unwrap_or_default()
    }

    /// Make the next poll fire immediately
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn afternoon() -> DateTime<FixedOffset> {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();
        FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&naive)
            .unwrap()
    }

    #[test]
    fn test_24_hour_format() {
        assert_eq!(TimeFormat::H24.format(&afternoon()), "15:04:05");
    }

    #[test]
    fn test_12_hour_format() {
        assert_eq!(TimeFormat::H12.format(&afternoon()), "03:04:05 PM");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(TimeFormat::H24.toggled(), TimeFormat::H12);
        assert_eq!(TimeFormat::H12.toggled(), TimeFormat::H24);
    }

    #[test]
    fn test_ticker_fires_once_per_period() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        assert!(ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(500)));
        assert_eq!(
            ticker.remaining(start + Duration::from_millis(400)),
            Duration::from_millis(600)
        );
        assert!(ticker.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_ticker_reset_fires_immediately() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        ticker.poll(start);
        ticker.reset();
        assert!(ticker.poll(start + Duration::from_millis(1)));
    }
}
