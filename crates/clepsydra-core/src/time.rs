//! Wall-clock sampling and the time-of-day to water-level mapping.

use chrono::{Local, NaiveDate, Timelike};

use crate::TimeFormat;

/// Number of seconds in a civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds elapsed since local midnight, ignoring sub-second precision.
pub fn seconds_into_day<T: Timelike>(t: &T) -> u32 {
    t.hour() * 3600 + t.minute() * 60 + t.second()
}

/// Fraction of the day elapsed, in `[0, 1)`.
pub fn water_level_fraction<T: Timelike>(t: &T) -> f32 {
    seconds_into_day(t) as f32 / SECONDS_PER_DAY as f32
}

/// Water level as a percentage of the day elapsed, in `[0, 100)`.
pub fn water_level_percent<T: Timelike>(t: &T) -> f32 {
    water_level_fraction(t) * 100.0
}

/// A snapshot of the local time, refreshed once per second by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    date: NaiveDate,
}

impl ClockSample {
    /// Sample the local system clock.
    pub fn now() -> Self {
        let now = Local::now();
        Self::from_parts(now.date_naive(), &now)
    }

    /// Build a sample from a date and any time-of-day value.
    pub fn from_parts<T: Timelike>(date: NaiveDate, t: &T) -> Self {
        Self {
            hours: t.hour(),
            minutes: t.minute(),
            seconds: t.second(),
            date,
        }
    }

    /// Seconds since midnight for this sample.
    pub fn seconds_into_day(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Water level percentage for this sample.
    pub fn water_level(&self) -> f32 {
        self.seconds_into_day() as f32 / SECONDS_PER_DAY as f32 * 100.0
    }

    /// Long date label, e.g. `Monday, October 19, 2026`.
    pub fn date_label(&self) -> String {
        self.date.format("%A, %B %d, %Y").to_string()
    }

    /// Hour on a 12-hour dial (1-12) and whether it is afternoon.
    pub fn twelve_hour(&self) -> (u32, bool) {
        let pm = self.hours >= 12;
        let h = match self.hours % 12 {
            0 => 12,
            h => h,
        };
        (h, pm)
    }
}

/// Format a sample as `HH:MM:SS`, or `hh:MM:SS AM` in 12-hour mode.
pub fn format_time(sample: &ClockSample, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => format!(
            "{:02}:{:02}:{:02}",
            sample.hours, sample.minutes, sample.seconds
        ),
        TimeFormat::TwelveHour => {
            let (h, pm) = sample.twelve_hour();
            let suffix = if pm { "PM" } else { "AM" };
            format!(
                "{:02}:{:02}:{:02} {}",
                h, sample.minutes, sample.seconds, suffix
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn sample(h: u32, m: u32, s: u32) -> ClockSample {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        ClockSample::from_parts(date, &at(h, m, s))
    }

    #[test]
    fn test_water_level_anchors() {
        assert_eq!(water_level_percent(&at(0, 0, 0)), 0.0);
        assert_eq!(water_level_percent(&at(12, 0, 0)), 50.0);
        assert_eq!(water_level_percent(&at(6, 0, 0)), 25.0);
        let last = water_level_percent(&at(23, 59, 59));
        assert!(last < 100.0 && last > 99.99);
    }

    #[test]
    fn test_water_level_monotonic_over_day() {
        let mut previous = -1.0;
        for minute in 0..(24 * 60) {
            let level = water_level_percent(&at(minute / 60, minute % 60, 30));
            assert!((0.0..100.0).contains(&level));
            assert!(level > previous);
            previous = level;
        }
    }

    #[test]
    fn test_fraction_matches_percent() {
        let t = at(18, 30, 0);
        assert!((water_level_fraction(&t) * 100.0 - water_level_percent(&t)).abs() < 1e-4);
    }

    #[test]
    fn test_sample_level_matches_free_function() {
        let s = sample(9, 15, 42);
        assert_eq!(s.water_level(), water_level_percent(&at(9, 15, 42)));
        assert_eq!(s.seconds_into_day(), 9 * 3600 + 15 * 60 + 42);
    }

    #[test]
    fn test_format_time_24h() {
        assert_eq!(
            format_time(&sample(7, 5, 9), TimeFormat::TwentyFourHour),
            "07:05:09"
        );
        assert_eq!(
            format_time(&sample(23, 59, 59), TimeFormat::TwentyFourHour),
            "23:59:59"
        );
    }

    #[test]
    fn test_format_time_12h() {
        assert_eq!(
            format_time(&sample(0, 10, 0), TimeFormat::TwelveHour),
            "12:10:00 AM"
        );
        assert_eq!(
            format_time(&sample(12, 0, 1), TimeFormat::TwelveHour),
            "12:00:01 PM"
        );
        assert_eq!(
            format_time(&sample(15, 45, 30), TimeFormat::TwelveHour),
            "03:45:30 PM"
        );
    }

    #[test]
    fn test_date_label() {
        assert_eq!(sample(1, 2, 3).date_label(), "Monday, October 19, 2026");
    }
}
