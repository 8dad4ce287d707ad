//! Quiz content schema shared across the workspace.
//!
//! A quiz is authored as pages of questions. The question variants are a
//! closed set and the `type` tag is part of the stored format: it never
//! changes after authoring, and answers travel under the same tags
//! ([`AnswerInput`]). Validated answers are flattened into storage-shaped
//! [`NormalizedAnswer`] values, with fill-in-the-blank maps encoded through
//! the reversible codec at the bottom of this module.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How a quiz is graded once an attempt is completed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradingType {
    Automatic,
    Manual,
}

/// Discriminant of the closed question set. The variants render exactly the
/// `type` tags used by [`Question`] and [`AnswerInput`].
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    Choice,
    FillInTheBlank,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::ShortAnswer => "short-answer",
            QuestionType::Choice => "choice",
            QuestionType::FillInTheBlank => "fill-in-the-blank",
        };
        write!(f, "{s}")
    }
}

/// How partial correctness on a multi-part question maps to points.
///
/// Single-valued questions ignore the policy; they are either right or wrong.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreditPolicy {
    AllOrNothing,
    Partial,
}

/// Scoring configuration carried by every auto-gradeable question.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScoringRule {
    /// Points awarded for a fully correct answer.
    pub points: f64,

    #[serde(default = "default_credit_policy")]
    pub credit: CreditPolicy,
}

fn default_credit_policy() -> CreditPolicy {
    CreditPolicy::AllOrNothing
}

/// A single authored question.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    /// Single-select over a fixed option set.
    MultipleChoice {
        id: String,
        prompt: String,
        /// Option key -> display text.
        options: BTreeMap<String, String>,
        /// Key of the single correct option.
        correct_answer: String,
        scoring: ScoringRule,
    },
    /// Free text with a reference answer. Never auto-graded, so it carries
    /// no scoring rule.
    ShortAnswer {
        id: String,
        prompt: String,
        correct_answer: String,
    },
    /// Multi-select. Correctness compares the selected key-set against
    /// `correct_answers`, order-independent.
    Choice {
        id: String,
        prompt: String,
        options: BTreeMap<String, String>,
        correct_answers: BTreeSet<String>,
        scoring: ScoringRule,
    },
    /// Named blanks, each with one expected value.
    FillInTheBlank {
        id: String,
        prompt: String,
        correct_answers: BTreeMap<String, String>,
        scoring: ScoringRule,
    },
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::MultipleChoice { id, .. }
            | Question::ShortAnswer { id, .. }
            | Question::Choice { id, .. }
            | Question::FillInTheBlank { id, .. } => id,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Question::MultipleChoice { prompt, .. }
            | Question::ShortAnswer { prompt, .. }
            | Question::Choice { prompt, .. }
            | Question::FillInTheBlank { prompt, .. } => prompt,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Question::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Question::ShortAnswer { .. } => QuestionType::ShortAnswer,
            Question::Choice { .. } => QuestionType::Choice,
            Question::FillInTheBlank { .. } => QuestionType::FillInTheBlank,
        }
    }

    /// Scoring rule, `None` only for short-answer questions.
    pub fn scoring(&self) -> Option<&ScoringRule> {
        match self {
            Question::MultipleChoice { scoring, .. }
            | Question::Choice { scoring, .. }
            | Question::FillInTheBlank { scoring, .. } => Some(scoring),
            Question::ShortAnswer { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuizPage {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// The authored content of one quiz, stored as JSON on the quiz row.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuizDefinition {
    pub grading_type: GradingType,

    /// Global attempt timer. `None` means untimed.
    #[serde(default)]
    pub time_limit_seconds: Option<i64>,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,

    pub pages: Vec<QuizPage>,
}

fn default_max_attempts() -> i64 {
    1
}

impl QuizDefinition {
    /// All questions across pages, in authored order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.pages.iter().flat_map(|p| p.questions.iter())
    }

    /// Looks up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id() == question_id)
    }

    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|p| p.questions.len()).sum()
    }

    /// Authoring-side sanity check: ids must be unique and non-empty, limits
    /// positive.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for q in self.questions() {
            if q.id().trim().is_empty() {
                return Err("question id must not be empty".to_string());
            }
            if !seen.insert(q.id()) {
                return Err(format!("duplicate question id '{}'", q.id()));
            }
        }
        if let Some(limit) = self.time_limit_seconds {
            if limit <= 0 {
                return Err("time_limit_seconds must be positive".to_string());
            }
        }
        if self.max_attempts < 1 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// The payload a caller submits for a single question. Tags mirror
/// [`Question`]; a payload only ever applies to a question of the same tag.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnswerInput {
    /// Selected option key.
    MultipleChoice { value: String },
    /// Free text.
    ShortAnswer { value: String },
    /// Selected option keys.
    Choice { value: Vec<String> },
    /// Blank name -> filled value.
    FillInTheBlank { value: BTreeMap<String, String> },
}

impl AnswerInput {
    pub fn answer_type(&self) -> QuestionType {
        match self {
            AnswerInput::MultipleChoice { .. } => QuestionType::MultipleChoice,
            AnswerInput::ShortAnswer { .. } => QuestionType::ShortAnswer,
            AnswerInput::Choice { .. } => QuestionType::Choice,
            AnswerInput::FillInTheBlank { .. } => QuestionType::FillInTheBlank,
        }
    }
}

/// Flat, storage-shaped form of a validated answer.
///
/// Single-valued types land in `selected_answer`, multi-select keys in
/// `multiple_choice_answers`, and blank maps are encoded into
/// `selected_answer` via [`encode_blank_values`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAnswer {
    pub question_type: QuestionType,
    pub selected_answer: Option<String>,
    pub multiple_choice_answers: Option<Vec<String>>,
}

/// Encodes a blank -> value map as a JSON object with a stable key order.
///
/// Equal maps always encode to the same string, and [`decode_blank_values`]
/// recovers the exact map.
pub fn encode_blank_values(values: &BTreeMap<String, String>) -> String {
    let object: serde_json::Map<String, serde_json::Value> = values
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();
    serde_json::Value::Object(object).to_string()
}

/// Inverse of [`encode_blank_values`].
pub fn decode_blank_values(
    encoded: &str,
) -> Result<BTreeMap<String, String>, serde_json::Error> {
    serde_json::from_str(encoded)
}
