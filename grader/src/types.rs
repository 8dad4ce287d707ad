//! Result types produced by grading.

use serde::Serialize;

/// Score outcome for a single auto-graded question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    /// Question id from the quiz definition.
    pub question_id: String,
    /// Points awarded, rounded to two decimals.
    pub awarded: f64,
    /// Maximum points the question's scoring rule offers.
    pub possible: f64,
}

/// Aggregate grade for one completed attempt.
///
/// Short-answer questions appear nowhere in the report; they carry no
/// scoring rule and contribute to neither total nor maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// Sum of awarded points over every scored question.
    pub total_score: f64,
    /// Sum of possible points over every scored question.
    pub max_score: f64,
    /// `total_score / max_score * 100`, `0.0` when nothing is scorable.
    pub percentage: f64,
    /// Per-question outcomes in authored order.
    pub question_results: Vec<QuestionResult>,
}
