//! Retention schedule arithmetic.
//!
//! A schedule carries one count per period plus the frequency at which
//! topics are exported. Every count is converted into the frequency's unit
//! with fixed approximations (1 month = 4 weeks, 1 year = 12 months,
//! 1 week = 7 days, 1 day = 24 hours) and the largest one becomes the
//! retention window.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{CleanupError, Result};

const WEEKS_PER_MONTH: u64 = 4;
const MONTHS_PER_YEAR: u64 = 12;
const DAYS_PER_WEEK: u64 = 7;
const HOURS_PER_DAY: u64 = 24;

const WEEKS_PER_YEAR: u64 = WEEKS_PER_MONTH * MONTHS_PER_YEAR;
const DAYS_PER_MONTH: u64 = WEEKS_PER_MONTH * DAYS_PER_WEEK;
const DAYS_PER_YEAR: u64 = WEEKS_PER_YEAR * DAYS_PER_WEEK;
const HOURS_PER_WEEK: u64 = DAYS_PER_WEEK * HOURS_PER_DAY;
const HOURS_PER_MONTH: u64 = DAYS_PER_MONTH * HOURS_PER_DAY;
const HOURS_PER_YEAR: u64 = DAYS_PER_YEAR * HOURS_PER_DAY;

/// Granularity at which topics are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Unit the retention window is expressed in for this frequency.
    pub fn unit(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hours",
            Frequency::Daily => "days",
            Frequency::Weekly => "weeks",
            Frequency::Monthly => "months",
            Frequency::Yearly => "years",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    /// Accepts both `daily` and the cron-style `@daily`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix('@').unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err("expected one of hourly, daily, weekly, monthly, yearly".to_string()),
        }
    }
}

/// How many periods of each kind to keep. Unset counts are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodCounts {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
}

/// Counts plus an optional frequency, as read from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionSchedule {
    pub counts: PeriodCounts,
    pub frequency: Option<Frequency>,
}

impl RetentionSchedule {
    /// The policy to enforce, or `None` when no frequency is selected.
    pub fn policy(&self) -> Option<RetentionPolicy> {
        self.frequency.map(|frequency| RetentionPolicy {
            counts: self.counts,
            frequency,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub counts: PeriodCounts,
    pub frequency: Frequency,
}

/// One period's count expressed in the frequency's unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowComponent {
    pub period: &'static str,
    pub span: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionWindow {
    pub frequency: Frequency,
    pub components: Vec<WindowComponent>,
    /// Largest component, in `frequency.unit()`.
    pub span: u64,
    pub offset: TimeDelta,
}

impl RetentionWindow {
    /// Instant at or before which topics are expired.
    pub fn cutoff(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        now.checked_sub_signed(self.offset)
            .ok_or(CleanupError::WindowOutOfRange {
                span: self.span,
                unit: self.frequency.unit(),
            })
    }
}

impl RetentionPolicy {
    pub fn window(&self) -> Result<RetentionWindow> {
        let c = &self.counts;
        let component = |period, span| WindowComponent { period, span };

        let components = match self.frequency {
            Frequency::Hourly => vec![
                component("hourly", c.hours),
                component("daily", c.days.saturating_mul(HOURS_PER_DAY)),
                component("weekly", c.weeks.saturating_mul(HOURS_PER_WEEK)),
                component("monthly", c.months.saturating_mul(HOURS_PER_MONTH)),
                component("yearly", c.years.saturating_mul(HOURS_PER_YEAR)),
            ],
            Frequency::Daily => vec![
                component("daily", c.days),
                component("weekly", c.weeks.saturating_mul(DAYS_PER_WEEK)),
                component("monthly", c.months.saturating_mul(DAYS_PER_MONTH)),
                component("yearly", c.years.saturating_mul(DAYS_PER_YEAR)),
            ],
            Frequency::Weekly => vec![
                component("weekly", c.weeks),
                component("monthly", c.months.saturating_mul(WEEKS_PER_MONTH)),
                component("yearly", c.years.saturating_mul(WEEKS_PER_YEAR)),
            ],
            Frequency::Monthly => vec![
                component("monthly", c.months),
                component("yearly", c.years.saturating_mul(MONTHS_PER_YEAR)),
            ],
            Frequency::Yearly => vec![component("yearly", c.years)],
        };

        let span = components.iter().map(|c| c.span).max().unwrap_or(0);
        let out_of_range = || CleanupError::WindowOutOfRange {
            span,
            unit: self.frequency.unit(),
        };

        let amount = |n: u64| i64::try_from(n).ok();

        // Months and years are subtracted as whole blocks of four weeks.
        let offset = match self.frequency {
            Frequency::Hourly => amount(span).and_then(TimeDelta::try_hours),
            Frequency::Daily => amount(span).and_then(TimeDelta::try_days),
            Frequency::Weekly => amount(span).and_then(TimeDelta::try_weeks),
            Frequency::Monthly => {
                amount(span.saturating_mul(WEEKS_PER_MONTH)).and_then(TimeDelta::try_weeks)
            }
            Frequency::Yearly => {
                amount(span.saturating_mul(WEEKS_PER_YEAR)).and_then(TimeDelta::try_weeks)
            }
        }
        .ok_or_else(out_of_range)?;

        Ok(RetentionWindow {
            frequency: self.frequency,
            components,
            span,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn policy(frequency: Frequency, counts: PeriodCounts) -> RetentionPolicy {
        RetentionPolicy { counts, frequency }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_weekly_takes_largest_equivalent() {
        let counts = PeriodCounts {
            weeks: 2,
            months: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Weekly, counts).window().unwrap();
        assert_eq!(window.span, 4);
        assert_eq!(window.offset, TimeDelta::weeks(4));
        assert_eq!(
            window.components,
            vec![
                WindowComponent { period: "weekly", span: 2 },
                WindowComponent { period: "monthly", span: 4 },
                WindowComponent { period: "yearly", span: 0 },
            ]
        );
    }

    #[test]
    fn test_daily_window() {
        let counts = PeriodCounts {
            days: 10,
            weeks: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Daily, counts).window().unwrap();
        assert_eq!(window.span, 10);
        assert_eq!(window.offset, TimeDelta::days(10));

        let counts = PeriodCounts {
            years: 1,
            ..counts
        };
        let window = policy(Frequency::Daily, counts).window().unwrap();
        assert_eq!(window.span, 336);
    }

    #[test]
    fn test_hourly_window() {
        let counts = PeriodCounts {
            hours: 30,
            days: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Hourly, counts).window().unwrap();
        assert_eq!(window.span, 30);
        assert_eq!(window.offset, TimeDelta::hours(30));

        let counts = PeriodCounts {
            months: 1,
            ..counts
        };
        assert_eq!(policy(Frequency::Hourly, counts).window().unwrap().span, 672);

        let counts = PeriodCounts {
            years: 1,
            ..counts
        };
        assert_eq!(policy(Frequency::Hourly, counts).window().unwrap().span, 8064);
    }

    #[test]
    fn test_monthly_window_uses_four_week_blocks() {
        let counts = PeriodCounts {
            months: 3,
            years: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Monthly, counts).window().unwrap();
        assert_eq!(window.span, 12);
        assert_eq!(window.offset, TimeDelta::weeks(48));
    }

    #[test]
    fn test_yearly_window_ignores_finer_periods() {
        let counts = PeriodCounts {
            years: 2,
            months: 100,
            days: 1000,
            ..Default::default()
        };
        let window = policy(Frequency::Yearly, counts).window().unwrap();
        assert_eq!(window.span, 2);
        assert_eq!(window.offset, TimeDelta::weeks(96));
    }

    #[test]
    fn test_zero_counts_give_zero_offset() {
        let window = policy(Frequency::Daily, PeriodCounts::default())
            .window()
            .unwrap();
        assert_eq!(window.span, 0);
        assert_eq!(window.cutoff(at(2024, 5, 1, 12)).unwrap(), at(2024, 5, 1, 12));
    }

    #[test]
    fn test_cutoff_subtracts_offset() {
        let counts = PeriodCounts {
            days: 3,
            ..Default::default()
        };
        let window = policy(Frequency::Daily, counts).window().unwrap();
        assert_eq!(window.cutoff(at(2024, 5, 10, 8)).unwrap(), at(2024, 5, 7, 8));
    }

    #[test]
    fn test_huge_window_is_rejected() {
        let counts = PeriodCounts {
            years: u64::MAX,
            ..Default::default()
        };
        let err = policy(Frequency::Hourly, counts).window().unwrap_err();
        assert!(matches!(err, CleanupError::WindowOutOfRange { unit: "hours", .. }));

        let counts = PeriodCounts {
            weeks: 1_000_000_000,
            ..Default::default()
        };
        let window = policy(Frequency::Weekly, counts).window().unwrap();
        assert_eq!(window.span, 1_000_000_000);
        let err = window.cutoff(at(2024, 1, 1, 0)).unwrap_err();
        assert!(matches!(
            err,
            CleanupError::WindowOutOfRange {
                span: 1_000_000_000,
                unit: "weeks"
            }
        ));
    }

    fn ones() -> PeriodCounts {
        PeriodCounts {
            years: 1,
            months: 1,
            weeks: 1,
            days: 1,
            hours: 1,
        }
    }

    fn spans(window: &RetentionWindow) -> Vec<(&'static str, u64)> {
        window
            .components
            .iter()
            .map(|c| (c.period, c.span))
            .collect()
    }

    #[test]
    fn test_hourly_conversion_factors() {
        let window = policy(Frequency::Hourly, ones()).window().unwrap();
        assert_eq!(
            spans(&window),
            vec![
                ("hourly", 1),
                ("daily", 24),
                ("weekly", 168),
                ("monthly", 672),
                ("yearly", 8064),
            ]
        );

        let counts = PeriodCounts {
            weeks: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Hourly, counts).window().unwrap();
        assert_eq!(window.span, 168);
        assert_eq!(window.offset, TimeDelta::hours(168));
    }

    #[test]
    fn test_daily_conversion_factors() {
        let window = policy(Frequency::Daily, ones()).window().unwrap();
        assert_eq!(
            spans(&window),
            vec![("daily", 1), ("weekly", 7), ("monthly", 28), ("yearly", 336)]
        );

        let counts = PeriodCounts {
            months: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Daily, counts).window().unwrap();
        assert_eq!(window.span, 28);
        assert_eq!(window.offset, TimeDelta::days(28));
    }

    #[test]
    fn test_weekly_conversion_factors() {
        let window = policy(Frequency::Weekly, ones()).window().unwrap();
        assert_eq!(
            spans(&window),
            vec![("weekly", 1), ("monthly", 4), ("yearly", 48)]
        );

        let counts = PeriodCounts {
            years: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Weekly, counts).window().unwrap();
        assert_eq!(window.span, 48);
        assert_eq!(window.offset, TimeDelta::weeks(48));
    }

    #[test]
    fn test_monthly_and_yearly_conversion_factors() {
        let window = policy(Frequency::Monthly, ones()).window().unwrap();
        assert_eq!(spans(&window), vec![("monthly", 1), ("yearly", 12)]);
        assert_eq!(window.offset, TimeDelta::weeks(48));

        let counts = PeriodCounts {
            months: 1,
            ..Default::default()
        };
        let window = policy(Frequency::Monthly, counts).window().unwrap();
        assert_eq!(window.offset, TimeDelta::weeks(4));

        let window = policy(Frequency::Yearly, ones()).window().unwrap();
        assert_eq!(spans(&window), vec![("yearly", 1)]);
        assert_eq!(window.offset, TimeDelta::weeks(48));
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!("@daily".parse::<Frequency>(), Ok(Frequency::Daily));
        assert_eq!(" HOURLY ".parse::<Frequency>(), Ok(Frequency::Hourly));
        assert_eq!("@Yearly".parse::<Frequency>(), Ok(Frequency::Yearly));
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_schedule_without_frequency_has_no_policy() {
        let schedule = RetentionSchedule {
            counts: PeriodCounts {
                days: 5,
                ..Default::default()
            },
            frequency: None,
        };
        assert_eq!(schedule.policy(), None);

        let schedule = RetentionSchedule {
            frequency: Some(Frequency::Daily),
            ..schedule
        };
        assert_eq!(schedule.policy().unwrap().frequency, Frequency::Daily);
    }
}
