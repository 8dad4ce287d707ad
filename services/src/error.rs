//! Error taxonomy for attempt operations.
//!
//! [`AttemptError::InvalidState`], [`AttemptError::NotFound`],
//! [`AttemptError::TypeMismatch`], [`AttemptError::TimeLimitExceeded`] and
//! [`AttemptError::Validation`] are expected domain outcomes. `Decode` and
//! `Database` indicate corrupt stored data or infrastructure failure.

use grader::error::{GraderError, TimeLimitExceeded, TypeMismatch};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttemptError {
    /// The operation requires an `in_progress` submission.
    #[error("submission must be in-progress")]
    InvalidState,

    /// A referenced record does not exist. Carries the referent's name:
    /// `submission`, `quiz` or `question`.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The answer payload's type tag differs from the question's.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// The attempt was completed after its timer ran out.
    #[error(transparent)]
    TimeLimitExceeded(#[from] TimeLimitExceeded),

    /// Malformed caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored quiz definition or answer row is not readable.
    #[error("stored record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Grading could not read a stored answer.
    #[error(transparent)]
    Grading(#[from] GraderError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

#[cfg(test)]
mod tests {
    use super::*;
    use util::quiz_schema::QuestionType;

    #[test]
    fn test_display_strings_are_canonical() {
        assert_eq!(
            AttemptError::InvalidState.to_string(),
            "submission must be in-progress"
        );
        assert_eq!(
            AttemptError::NotFound("submission").to_string(),
            "submission not found"
        );
        assert_eq!(
            AttemptError::Validation("attempt_number must be at least 1".to_string()).to_string(),
            "validation error: attempt_number must be at least 1"
        );
    }

    #[test]
    fn test_grader_errors_pass_through_transparently() {
        let mismatch = AttemptError::from(TypeMismatch {
            expected: QuestionType::Choice,
            actual: QuestionType::ShortAnswer,
        });
        assert_eq!(
            mismatch.to_string(),
            "answer type does not match question type"
        );

        let exceeded = AttemptError::from(TimeLimitExceeded {
            elapsed_seconds: 121.0,
            limit_seconds: 120,
        });
        assert_eq!(exceeded.to_string(), "time limit exceeded");
    }
}
