//! Grader error types.
//!
//! Validation and grading distinguish three failure shapes: a payload of the
//! wrong type for its question ([`TypeMismatch`]), an attempt completed after
//! its timer ([`TimeLimitExceeded`]), and stored data the grader cannot read
//! ([`GraderError`]). The first two are expected domain outcomes; the last
//! signals a corrupt or drifted record.

use thiserror::Error;
use util::quiz_schema::QuestionType;

/// Answer payload type does not match the target question's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("answer type does not match question type")]
pub struct TypeMismatch {
    /// The question's tag.
    pub expected: QuestionType,
    /// The submitted payload's tag.
    pub actual: QuestionType,
}

/// The attempt ran past the quiz's global timer.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("time limit exceeded")]
pub struct TimeLimitExceeded {
    /// Seconds between the attempt's start and the completion call.
    pub elapsed_seconds: f64,
    /// The configured limit.
    pub limit_seconds: i64,
}

/// Errors raised while grading stored answers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraderError {
    /// A stored answer cannot be read for its question: missing payload
    /// field, undecodable blank map, or a stored type tag that no longer
    /// matches the question.
    #[error("invalid answer payload for question {question_id}: {reason}")]
    InvalidAnswerPayload { question_id: String, reason: String },
}
