use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

/// Formats elapsed seconds as `m:ss`.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whole seconds between `start` and `now`, zero if `now` lies before `start`.
#[must_use]
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - start).num_seconds()).unwrap_or(0)
}

/// Length of a workout session as stored in the workout notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutDuration(u64);

impl WorkoutDuration {
    const PREFIX: &'static str = "Duration:";

    #[must_use]
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub fn seconds(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkoutDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}m {}s", Self::PREFIX, self.0 / 60, self.0 % 60)
    }
}

impl FromStr for WorkoutDuration {
    type Err = WorkoutDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .trim()
            .strip_prefix(Self::PREFIX)
            .ok_or(WorkoutDurationError::MissingPrefix)?;
        let (minutes, seconds) = rest
            .trim()
            .split_once(' ')
            .ok_or(WorkoutDurationError::InvalidFormat)?;
        let minutes = minutes
            .strip_suffix('m')
            .and_then(|m| m.parse::<u64>().ok())
            .ok_or(WorkoutDurationError::InvalidFormat)?;
        let seconds = seconds
            .trim()
            .strip_suffix('s')
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s < 60)
            .ok_or(WorkoutDurationError::InvalidFormat)?;
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .map(Self)
            .ok_or(WorkoutDurationError::InvalidFormat)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutDurationError {
    #[error("missing duration prefix")]
    MissingPrefix,
    #[error("invalid duration format")]
    InvalidFormat,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "0:00")]
    #[case(9, "0:09")]
    #[case(61, "1:01")]
    #[case(3600, "60:00")]
    #[case(5999, "99:59")]
    fn test_format_elapsed(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_elapsed(seconds), expected);
    }

    #[test]
    fn test_elapsed_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(elapsed_seconds(start, start + Duration::milliseconds(1999)), 1);
        assert_eq!(elapsed_seconds(start, start + Duration::minutes(75)), 4500);
        assert_eq!(elapsed_seconds(start, start - Duration::seconds(5)), 0);
    }

    #[rstest]
    #[case(0, "Duration: 0m 0s")]
    #[case(725, "Duration: 12m 5s")]
    #[case(4500, "Duration: 75m 0s")]
    fn test_workout_duration_display(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(WorkoutDuration::from_seconds(seconds).to_string(), expected);
    }

    #[rstest]
    #[case("Duration: 12m 5s", Ok(WorkoutDuration(725)))]
    #[case("  Duration: 0m 59s ", Ok(WorkoutDuration(59)))]
    #[case("Felt strong", Err(WorkoutDurationError::MissingPrefix))]
    #[case("Duration: 12 minutes", Err(WorkoutDurationError::InvalidFormat))]
    #[case("Duration: 12m 60s", Err(WorkoutDurationError::InvalidFormat))]
    #[case(
        "Duration: 999999999999999999m 0s",
        Err(WorkoutDurationError::InvalidFormat)
    )]
    fn test_workout_duration_from_str(
        #[case] value: &str,
        #[case] expected: Result<WorkoutDuration, WorkoutDurationError>,
    ) {
        assert_eq!(value.parse::<WorkoutDuration>(), expected);
    }
}
