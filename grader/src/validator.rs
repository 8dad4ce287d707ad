//! Answer validation.
//!
//! An answer payload is accepted only when its type tag matches the target
//! question's tag. Option keys and blank names are not checked here: an
//! unknown key is a legal submission that simply scores as incorrect.

use crate::error::TypeMismatch;
use util::quiz_schema::{AnswerInput, NormalizedAnswer, Question, encode_blank_values};

/// Checks `answer` against `question` and flattens it into its stored shape.
///
/// Multi-select values keep their submitted order and duplicates; scoring
/// collapses them to a set later. Blank maps are encoded through the
/// deterministic blank-value codec.
///
/// # Errors
///
/// Returns [`TypeMismatch`] when the payload's tag differs from the
/// question's tag. Nothing is stored in that case.
pub fn validate(
    question: &Question,
    answer: &AnswerInput,
) -> Result<NormalizedAnswer, TypeMismatch> {
    let expected = question.question_type();
    let actual = answer.answer_type();
    if expected != actual {
        return Err(TypeMismatch { expected, actual });
    }

    let normalized = match answer {
        AnswerInput::MultipleChoice { value } | AnswerInput::ShortAnswer { value } => {
            NormalizedAnswer {
                question_type: actual,
                selected_answer: Some(value.clone()),
                multiple_choice_answers: None,
            }
        }
        AnswerInput::Choice { value } => NormalizedAnswer {
            question_type: actual,
            selected_answer: None,
            multiple_choice_answers: Some(value.clone()),
        },
        AnswerInput::FillInTheBlank { value } => NormalizedAnswer {
            question_type: actual,
            selected_answer: Some(encode_blank_values(value)),
            multiple_choice_answers: None,
        },
    };

    Ok(normalized)
}
