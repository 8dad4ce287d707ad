//! Attempt timer guard.
//!
//! The timer is only consulted when an attempt completes; answering is never
//! blocked, and no background job expires overdue attempts. A quiz without
//! `time_limit_seconds` is untimed.

use crate::error::TimeLimitExceeded;
use chrono::{DateTime, Utc};
use util::quiz_schema::QuizDefinition;

/// Verifies that `now` falls within the quiz's timer, measured from
/// `started_at`.
///
/// Elapsed time is compared in milliseconds, so an attempt that is even a
/// fraction of a second over the limit fails. Landing exactly on the boundary
/// still passes, and a skewed clock that puts `now` before `started_at`
/// counts as zero elapsed.
pub fn check_within_limit(
    definition: &QuizDefinition,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), TimeLimitExceeded> {
    let Some(limit_seconds) = definition.time_limit_seconds else {
        return Ok(());
    };

    let elapsed_ms = (now - started_at).num_milliseconds().max(0);
    if elapsed_ms > limit_seconds * 1000 {
        return Err(TimeLimitExceeded {
            elapsed_seconds: elapsed_ms as f64 / 1000.0,
            limit_seconds,
        });
    }

    Ok(())
}

/// Whole seconds left on the attempt's timer, `None` when the quiz is
/// untimed. Never negative.
pub fn remaining_seconds(
    definition: &QuizDefinition,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<i64> {
    let limit_seconds = definition.time_limit_seconds?;
    let elapsed_ms = (now - started_at).num_milliseconds().max(0);
    let remaining_ms = (limit_seconds * 1000 - elapsed_ms).max(0);
    Some(remaining_ms / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use util::quiz_schema::GradingType;

    fn definition(time_limit_seconds: Option<i64>) -> QuizDefinition {
        QuizDefinition {
            grading_type: GradingType::Automatic,
            time_limit_seconds,
            max_attempts: 1,
            pages: vec![],
        }
    }

    #[test]
    fn test_untimed_quiz_always_passes() {
        let started = Utc::now();
        let later = started + Duration::days(30);
        assert!(check_within_limit(&definition(None), started, later).is_ok());
    }

    #[test]
    fn test_within_limit_passes() {
        let started = Utc::now();
        let now = started + Duration::seconds(45);
        assert!(check_within_limit(&definition(Some(60)), started, now).is_ok());
    }

    #[test]
    fn test_exactly_on_the_boundary_passes() {
        let started = Utc::now();
        let now = started + Duration::seconds(60);
        assert!(check_within_limit(&definition(Some(60)), started, now).is_ok());
    }

    #[test]
    fn test_sub_second_overrun_fails() {
        let started = Utc::now();
        let now = started + Duration::seconds(60) + Duration::milliseconds(500);
        let err = check_within_limit(&definition(Some(60)), started, now).unwrap_err();
        assert_eq!(err.limit_seconds, 60);
        assert_eq!(err.elapsed_seconds, 60.5);
        assert_eq!(err.to_string(), "time limit exceeded");
    }

    #[test]
    fn test_clock_skew_counts_as_zero_elapsed() {
        let started = Utc::now();
        let earlier = started - Duration::seconds(30);
        assert!(check_within_limit(&definition(Some(60)), started, earlier).is_ok());
    }

    #[test]
    fn test_remaining_seconds_counts_down() {
        let started = Utc::now();
        let def = definition(Some(60));

        assert_eq!(remaining_seconds(&def, started, started), Some(60));
        assert_eq!(
            remaining_seconds(&def, started, started + Duration::seconds(45)),
            Some(15)
        );
        assert_eq!(
            remaining_seconds(&def, started, started + Duration::seconds(90)),
            Some(0)
        );
        assert_eq!(remaining_seconds(&definition(None), started, started), None);
    }
}
