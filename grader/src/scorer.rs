//! # Scorer Module
//!
//! Per-question scoring and whole-attempt grade aggregation. Grading is a
//! pure function of the quiz definition and the stored answer set: the same
//! inputs always produce the same report.
//!
//! Scoring never mutates anything. Unknown option keys and blank names score
//! as incorrect rather than erroring; only unreadable stored payloads fail.

use crate::error::GraderError;
use crate::round2;
use crate::types::{GradeReport, QuestionResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use util::quiz_schema::{
    CreditPolicy, NormalizedAnswer, Question, QuizDefinition, ScoringRule, decode_blank_values,
};

/// `earned / total * 100`, `0.0` when `total` is zero or negative.
pub fn percentage(earned: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (earned * 100.0) / total
    }
}

/// Scores one question against its stored answer, if any.
///
/// Returns `Ok(None)` for short-answer questions: they carry no scoring rule
/// and contribute to neither total nor maximum. Every other question yields a
/// result, scoring zero when unanswered or wrong.
///
/// # Errors
///
/// [`GraderError::InvalidAnswerPayload`] when a stored answer cannot be read
/// for this question: a missing payload field, an undecodable blank map, or a
/// stored type tag that no longer matches the question.
pub fn score_question(
    question: &Question,
    answer: Option<&NormalizedAnswer>,
) -> Result<Option<QuestionResult>, GraderError> {
    let Some(scoring) = question.scoring() else {
        return Ok(None);
    };

    let awarded = match answer {
        None => 0.0,
        Some(stored) => {
            if stored.question_type != question.question_type() {
                return Err(invalid_payload(
                    question,
                    format!(
                        "stored type {} does not match question type {}",
                        stored.question_type,
                        question.question_type()
                    ),
                ));
            }
            score_answered(question, scoring, stored)?
        }
    };

    Ok(Some(QuestionResult {
        question_id: question.id().to_string(),
        awarded: round2(awarded),
        possible: scoring.points,
    }))
}

/// Grades a whole answer set against its quiz definition.
///
/// Walks every question in authored order; questions without a stored answer
/// score zero. Totals and the percentage are rounded to two decimals.
pub fn grade_submission(
    definition: &QuizDefinition,
    answers: &HashMap<String, NormalizedAnswer>,
) -> Result<GradeReport, GraderError> {
    let mut question_results = Vec::new();
    let mut total_score = 0.0;
    let mut max_score = 0.0;

    for question in definition.questions() {
        if let Some(result) = score_question(question, answers.get(question.id()))? {
            total_score += result.awarded;
            max_score += result.possible;
            question_results.push(result);
        }
    }

    Ok(GradeReport {
        total_score: round2(total_score),
        max_score: round2(max_score),
        percentage: round2(percentage(total_score, max_score)),
        question_results,
    })
}

fn score_answered(
    question: &Question,
    scoring: &ScoringRule,
    stored: &NormalizedAnswer,
) -> Result<f64, GraderError> {
    match question {
        Question::MultipleChoice { correct_answer, .. } => {
            let selected = required_selected(question, stored)?;
            Ok(if selected == correct_answer {
                scoring.points
            } else {
                0.0
            })
        }
        Question::Choice {
            correct_answers, ..
        } => {
            let selected = stored.multiple_choice_answers.as_deref().ok_or_else(|| {
                invalid_payload(question, "missing selected option keys".to_string())
            })?;
            Ok(score_key_set(selected, correct_answers, scoring))
        }
        Question::FillInTheBlank {
            correct_answers, ..
        } => {
            let encoded = required_selected(question, stored)?;
            let filled = decode_blank_values(encoded).map_err(|err| {
                invalid_payload(question, format!("undecodable blank map: {err}"))
            })?;
            Ok(score_blanks(&filled, correct_answers, scoring))
        }
        // Unreachable: short-answer carries no scoring rule.
        Question::ShortAnswer { .. } => Ok(0.0),
    }
}

fn required_selected<'a>(
    question: &Question,
    stored: &'a NormalizedAnswer,
) -> Result<&'a str, GraderError> {
    stored
        .selected_answer
        .as_deref()
        .ok_or_else(|| invalid_payload(question, "missing selected answer".to_string()))
}

fn invalid_payload(question: &Question, reason: String) -> GraderError {
    GraderError::InvalidAnswerPayload {
        question_id: question.id().to_string(),
        reason,
    }
}

/// Set comparison for multi-select questions. Duplicate submitted keys
/// collapse before comparison; under partial credit, selecting more keys than
/// the correct set draws a proportional penalty.
fn score_key_set(selected: &[String], correct: &BTreeSet<String>, scoring: &ScoringRule) -> f64 {
    let selected: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
    let hits = selected.iter().filter(|k| correct.contains(**k)).count();

    match scoring.credit {
        CreditPolicy::AllOrNothing => {
            if hits == correct.len() && selected.len() == correct.len() {
                scoring.points
            } else {
                0.0
            }
        }
        CreditPolicy::Partial => {
            if correct.is_empty() {
                return if selected.is_empty() { scoring.points } else { 0.0 };
            }
            let mut awarded = scoring.points * hits as f64 / correct.len() as f64;
            if selected.len() > correct.len() {
                awarded *= correct.len() as f64 / selected.len() as f64;
            }
            awarded
        }
    }
}

/// Per-blank comparison, exact string equality. Submitted blank names the
/// question does not define are ignored. A question with no expected blanks
/// awards full marks only to an empty submission, like an empty key set.
fn score_blanks(
    filled: &BTreeMap<String, String>,
    correct: &BTreeMap<String, String>,
    scoring: &ScoringRule,
) -> f64 {
    if correct.is_empty() {
        return if filled.is_empty() { scoring.points } else { 0.0 };
    }

    let hits = correct
        .iter()
        .filter(|(name, expected)| filled.get(*name) == Some(*expected))
        .count();

    match scoring.credit {
        CreditPolicy::AllOrNothing => {
            if hits == correct.len() {
                scoring.points
            } else {
                0.0
            }
        }
        CreditPolicy::Partial => scoring.points * hits as f64 / correct.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;
    use util::quiz_schema::{AnswerInput, GradingType, QuizPage};

    fn options(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter()
            .map(|k| (k.to_string(), format!("option {k}")))
            .collect()
    }

    fn rule(points: f64, credit: CreditPolicy) -> ScoringRule {
        ScoringRule { points, credit }
    }

    fn mc(points: f64) -> Question {
        Question::MultipleChoice {
            id: "q1".to_string(),
            prompt: "Pick one".to_string(),
            options: options(&["a", "b", "c"]),
            correct_answer: "b".to_string(),
            scoring: rule(points, CreditPolicy::AllOrNothing),
        }
    }

    fn choice(credit: CreditPolicy) -> Question {
        Question::Choice {
            id: "q2".to_string(),
            prompt: "Pick all".to_string(),
            options: options(&["a", "b", "c", "d"]),
            correct_answers: BTreeSet::from(["a".to_string(), "c".to_string()]),
            scoring: rule(10.0, credit),
        }
    }

    fn blanks(credit: CreditPolicy) -> Question {
        Question::FillInTheBlank {
            id: "q3".to_string(),
            prompt: "{x} and {y}".to_string(),
            correct_answers: BTreeMap::from([
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "2".to_string()),
            ]),
            scoring: rule(4.0, credit),
        }
    }

    fn short() -> Question {
        Question::ShortAnswer {
            id: "q4".to_string(),
            prompt: "Explain".to_string(),
            correct_answer: "because".to_string(),
        }
    }

    fn answered(question: &Question, answer: AnswerInput) -> NormalizedAnswer {
        validate(question, &answer).expect("answer should validate")
    }

    fn keys(values: &[&str]) -> AnswerInput {
        AnswerInput::Choice {
            value: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn filled(pairs: &[(&str, &str)]) -> AnswerInput {
        AnswerInput::FillInTheBlank {
            value: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_multiple_choice_exact_match_gets_full_points() {
        let q = mc(100.0);
        let a = answered(&q, AnswerInput::MultipleChoice { value: "b".to_string() });
        let result = score_question(&q, Some(&a)).unwrap().unwrap();
        assert_eq!(result.awarded, 100.0);
        assert_eq!(result.possible, 100.0);
    }

    #[test]
    fn test_multiple_choice_wrong_or_unknown_key_scores_zero() {
        let q = mc(100.0);

        let wrong = answered(&q, AnswerInput::MultipleChoice { value: "a".to_string() });
        assert_eq!(score_question(&q, Some(&wrong)).unwrap().unwrap().awarded, 0.0);

        let unknown = answered(&q, AnswerInput::MultipleChoice { value: "zz".to_string() });
        assert_eq!(score_question(&q, Some(&unknown)).unwrap().unwrap().awarded, 0.0);
    }

    #[test]
    fn test_unanswered_question_counts_toward_maximum() {
        let result = score_question(&mc(100.0), None).unwrap().unwrap();
        assert_eq!(result.awarded, 0.0);
        assert_eq!(result.possible, 100.0);
    }

    #[test]
    fn test_short_answer_is_never_scored() {
        let q = short();
        let a = answered(&q, AnswerInput::ShortAnswer { value: "free text".to_string() });
        assert_eq!(score_question(&q, Some(&a)).unwrap(), None);
        assert_eq!(score_question(&q, None).unwrap(), None);
    }

    #[test]
    fn test_choice_all_or_nothing_is_order_independent() {
        let q = choice(CreditPolicy::AllOrNothing);

        let a = answered(&q, keys(&["c", "a"]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 10.0);

        let missing_one = answered(&q, keys(&["a"]));
        assert_eq!(score_question(&q, Some(&missing_one)).unwrap().unwrap().awarded, 0.0);

        let extra = answered(&q, keys(&["a", "c", "b"]));
        assert_eq!(score_question(&q, Some(&extra)).unwrap().unwrap().awarded, 0.0);
    }

    #[test]
    fn test_choice_duplicate_keys_collapse_to_a_set() {
        let q = choice(CreditPolicy::AllOrNothing);
        let a = answered(&q, keys(&["a", "a", "c"]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 10.0);
    }

    #[test]
    fn test_choice_partial_credits_each_hit() {
        let q = choice(CreditPolicy::Partial);
        let a = answered(&q, keys(&["a"]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 5.0);
    }

    #[test]
    fn test_choice_partial_penalizes_over_selection() {
        let q = choice(CreditPolicy::Partial);
        // Both correct keys plus one extra: 10 * 2/2 * 2/3.
        let a = answered(&q, keys(&["a", "c", "b"]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 6.67);
    }

    #[test]
    fn test_choice_with_no_correct_keys_requires_an_empty_selection() {
        let q = Question::Choice {
            id: "q2".to_string(),
            prompt: "Pick none".to_string(),
            options: options(&["a", "b"]),
            correct_answers: BTreeSet::new(),
            scoring: rule(10.0, CreditPolicy::Partial),
        };

        let none = answered(&q, keys(&[]));
        assert_eq!(score_question(&q, Some(&none)).unwrap().unwrap().awarded, 10.0);

        let stray = answered(&q, keys(&["a"]));
        assert_eq!(score_question(&q, Some(&stray)).unwrap().unwrap().awarded, 0.0);
    }

    #[test]
    fn test_fill_in_partial_credits_each_blank() {
        let q = blanks(CreditPolicy::Partial);
        let a = answered(&q, filled(&[("x", "1"), ("y", "wrong")]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 2.0);
    }

    #[test]
    fn test_fill_in_all_or_nothing_requires_every_blank() {
        let q = blanks(CreditPolicy::AllOrNothing);

        let perfect = answered(&q, filled(&[("x", "1"), ("y", "2")]));
        assert_eq!(score_question(&q, Some(&perfect)).unwrap().unwrap().awarded, 4.0);

        let one_wrong = answered(&q, filled(&[("x", "1"), ("y", "wrong")]));
        assert_eq!(score_question(&q, Some(&one_wrong)).unwrap().unwrap().awarded, 0.0);
    }

    #[test]
    fn test_fill_in_comparison_is_exact() {
        let q = blanks(CreditPolicy::Partial);
        // Case and whitespace both count.
        let a = answered(&q, filled(&[("x", " 1"), ("y", "2")]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 2.0);
    }

    #[test]
    fn test_fill_in_ignores_unknown_blank_names() {
        let q = blanks(CreditPolicy::AllOrNothing);
        let a = answered(&q, filled(&[("x", "1"), ("y", "2"), ("z", "9")]));
        assert_eq!(score_question(&q, Some(&a)).unwrap().unwrap().awarded, 4.0);
    }

    #[test]
    fn test_fill_in_with_no_expected_blanks_requires_an_empty_map() {
        for credit in [CreditPolicy::AllOrNothing, CreditPolicy::Partial] {
            let q = Question::FillInTheBlank {
                id: "q3".to_string(),
                prompt: "Nothing to fill".to_string(),
                correct_answers: BTreeMap::new(),
                scoring: rule(4.0, credit),
            };

            let empty = answered(&q, filled(&[]));
            assert_eq!(score_question(&q, Some(&empty)).unwrap().unwrap().awarded, 4.0);

            let stray = answered(&q, filled(&[("z", "9")]));
            assert_eq!(score_question(&q, Some(&stray)).unwrap().unwrap().awarded, 0.0);
        }
    }

    #[test]
    fn test_stored_type_drift_is_an_invalid_payload() {
        let q = mc(100.0);
        let drifted = NormalizedAnswer {
            question_type: util::quiz_schema::QuestionType::Choice,
            selected_answer: None,
            multiple_choice_answers: Some(vec!["b".to_string()]),
        };

        let err = score_question(&q, Some(&drifted)).unwrap_err();
        assert!(matches!(err, GraderError::InvalidAnswerPayload { .. }));
    }

    #[test]
    fn test_missing_payload_field_is_an_invalid_payload() {
        let q = choice(CreditPolicy::Partial);
        let hollow = NormalizedAnswer {
            question_type: util::quiz_schema::QuestionType::Choice,
            selected_answer: None,
            multiple_choice_answers: None,
        };

        assert!(score_question(&q, Some(&hollow)).is_err());
    }

    #[test]
    fn test_corrupt_blank_map_is_an_invalid_payload() {
        let q = blanks(CreditPolicy::Partial);
        let corrupt = NormalizedAnswer {
            question_type: util::quiz_schema::QuestionType::FillInTheBlank,
            selected_answer: Some("not a json object".to_string()),
            multiple_choice_answers: None,
        };

        let err = score_question(&q, Some(&corrupt)).unwrap_err();
        let GraderError::InvalidAnswerPayload { question_id, .. } = err;
        assert_eq!(question_id, "q3");
    }

    fn full_definition() -> QuizDefinition {
        QuizDefinition {
            grading_type: GradingType::Automatic,
            time_limit_seconds: None,
            max_attempts: 1,
            pages: vec![
                QuizPage {
                    title: None,
                    questions: vec![mc(100.0), choice(CreditPolicy::Partial)],
                },
                QuizPage {
                    title: None,
                    questions: vec![blanks(CreditPolicy::AllOrNothing), short()],
                },
            ],
        }
    }

    #[test]
    fn test_grade_submission_aggregates_in_authored_order() {
        let definition = full_definition();
        let mut answers = HashMap::new();
        answers.insert(
            "q1".to_string(),
            answered(&mc(100.0), AnswerInput::MultipleChoice { value: "b".to_string() }),
        );
        answers.insert(
            "q2".to_string(),
            answered(&choice(CreditPolicy::Partial), keys(&["a"])),
        );
        // q3 left unanswered, q4 is short answer.

        let report = grade_submission(&definition, &answers).unwrap();
        assert_eq!(report.total_score, 105.0);
        assert_eq!(report.max_score, 114.0);
        assert_eq!(report.percentage, 92.11);

        let ids: Vec<&str> = report
            .question_results
            .iter()
            .map(|r| r.question_id.as_str())
            .collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_grading_is_deterministic() {
        let definition = full_definition();
        let mut answers = HashMap::new();
        answers.insert(
            "q2".to_string(),
            answered(&choice(CreditPolicy::Partial), keys(&["a", "b"])),
        );

        let first = grade_submission(&definition, &answers).unwrap();
        let second = grade_submission(&definition, &answers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nothing_scorable_yields_zero_percentage() {
        let definition = QuizDefinition {
            grading_type: GradingType::Automatic,
            time_limit_seconds: None,
            max_attempts: 1,
            pages: vec![QuizPage {
                title: None,
                questions: vec![short()],
            }],
        };

        let report = grade_submission(&definition, &HashMap::new()).unwrap();
        assert_eq!(report.total_score, 0.0);
        assert_eq!(report.max_score, 0.0);
        assert_eq!(report.percentage, 0.0);
        assert!(report.question_results.is_empty());
    }

    #[test]
    fn test_percentage_guards_zero_total() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 10.0), 50.0);
    }
}
