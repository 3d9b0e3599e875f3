//! Evaluation clock: the single source of "now" for recency.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", content = "at", rename_all = "snake_case")]
pub enum EvalClock {
    /// Wall clock, UTC.
    #[default]
    System,
    /// Pinned instant. Tests and replays use this.
    Fixed(NaiveDateTime),
}

impl EvalClock {
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::Fixed(at)
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Utc::now().naive_utc(),
            Self::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Whole days from `earlier` to now, truncated toward zero.
    /// Negative when `earlier` lies in the future.
    pub fn days_since(&self, earlier: NaiveDateTime) -> i64 {
        (self.now() - earlier).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn fixed_clock_is_stable() {
        let clock = EvalClock::fixed(noon());
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn days_since_truncates_toward_zero() {
        let clock = EvalClock::fixed(noon());
        assert_eq!(clock.days_since(noon() - Duration::hours(47)), 1);
        assert_eq!(clock.days_since(noon() - Duration::days(120)), 120);
        assert_eq!(clock.days_since(noon() + Duration::hours(36)), -1);
    }
}
