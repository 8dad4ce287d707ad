//! Entity for per-question answers recorded against an attempt.
//!
//! At most one row exists per `(submission_id, question_id)`; re-answering
//! updates the row in place, so the `id` column preserves first-answer order.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use strum::{Display, EnumString};
use util::quiz_schema::{self, NormalizedAnswer};

/// Stored copy of the question's type tag, kept with the answer so grading
/// can detect drift against the quiz definition.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum QuestionType {
    #[sea_orm(string_value = "multiple-choice")]
    MultipleChoice,
    #[sea_orm(string_value = "short-answer")]
    ShortAnswer,
    #[sea_orm(string_value = "choice")]
    Choice,
    #[sea_orm(string_value = "fill-in-the-blank")]
    FillInTheBlank,
}

impl From<QuestionType> for quiz_schema::QuestionType {
    fn from(value: QuestionType) -> Self {
        match value {
            QuestionType::MultipleChoice => quiz_schema::QuestionType::MultipleChoice,
            QuestionType::ShortAnswer => quiz_schema::QuestionType::ShortAnswer,
            QuestionType::Choice => quiz_schema::QuestionType::Choice,
            QuestionType::FillInTheBlank => quiz_schema::QuestionType::FillInTheBlank,
        }
    }
}

impl From<quiz_schema::QuestionType> for QuestionType {
    fn from(value: quiz_schema::QuestionType) -> Self {
        match value {
            quiz_schema::QuestionType::MultipleChoice => QuestionType::MultipleChoice,
            quiz_schema::QuestionType::ShortAnswer => QuestionType::ShortAnswer,
            quiz_schema::QuestionType::Choice => QuestionType::Choice,
            quiz_schema::QuestionType::FillInTheBlank => QuestionType::FillInTheBlank,
        }
    }
}

/// One recorded answer for one question of an attempt.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_submission_answers")]
pub struct Model {
    /// Primary key of the answer row.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// ID of the submission the answer belongs to.
    pub submission_id: i64,

    /// Question id from the quiz definition.
    pub question_id: String,

    /// Type tag of the answered question.
    pub question_type: QuestionType,

    /// Flat payload for single-valued answers; fill-in-the-blank maps are
    /// stored through the blank-value codec.
    pub selected_answer: Option<String>,

    /// Selected option keys for multi-select answers, as a JSON array.
    pub multiple_choice_answers: Option<Json>,

    /// Timestamp when the answer was first recorded.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the answer was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl ActiveModel {
    /// Builds the row for an insert or upsert from a validated answer.
    pub fn from_normalized(
        submission_id: i64,
        question_id: &str,
        answer: &NormalizedAnswer,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: Set(submission_id),
            question_id: Set(question_id.to_string()),
            question_type: Set(answer.question_type.into()),
            selected_answer: Set(answer.selected_answer.clone()),
            multiple_choice_answers: Set(answer
                .multiple_choice_answers
                .as_ref()
                .map(|keys| serde_json::json!(keys))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

impl Model {
    /// Decodes the stored row back into the validator's flat form.
    pub fn to_normalized(&self) -> Result<NormalizedAnswer, serde_json::Error> {
        let keys = match &self.multiple_choice_answers {
            Some(value) => Some(serde_json::from_value(value.clone())?),
            None => None,
        };
        Ok(NormalizedAnswer {
            question_type: self.question_type.clone().into(),
            selected_answer: self.selected_answer.clone(),
            multiple_choice_answers: keys,
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Link to the owning submission.
    #[sea_orm(
        belongs_to = "super::quiz_submission::Entity",
        from = "Column::SubmissionId",
        to = "super::quiz_submission::Column::Id"
    )]
    QuizSubmission,
}

impl Related<super::quiz_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use util::quiz_schema::encode_blank_values;

    #[test]
    fn multi_select_payload_round_trips() {
        let normalized = NormalizedAnswer {
            question_type: quiz_schema::QuestionType::Choice,
            selected_answer: None,
            multiple_choice_answers: Some(vec!["a".to_string(), "c".to_string()]),
        };
        let now = Utc::now();

        let active = ActiveModel::from_normalized(10, "q3", &normalized, now);
        let model = Model {
            id: 1,
            submission_id: 10,
            question_id: "q3".to_string(),
            question_type: active.question_type.clone().unwrap(),
            selected_answer: active.selected_answer.clone().unwrap(),
            multiple_choice_answers: active.multiple_choice_answers.clone().unwrap(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(model.to_normalized().unwrap(), normalized);
    }

    #[test]
    fn blank_map_payload_round_trips() {
        let mut blanks = BTreeMap::new();
        blanks.insert("country".to_string(), "France".to_string());
        blanks.insert("capital".to_string(), "Paris".to_string());

        let normalized = NormalizedAnswer {
            question_type: quiz_schema::QuestionType::FillInTheBlank,
            selected_answer: Some(encode_blank_values(&blanks)),
            multiple_choice_answers: None,
        };
        let now = Utc::now();

        let active = ActiveModel::from_normalized(10, "q4", &normalized, now);
        let model = Model {
            id: 2,
            submission_id: 10,
            question_id: "q4".to_string(),
            question_type: active.question_type.clone().unwrap(),
            selected_answer: active.selected_answer.clone().unwrap(),
            multiple_choice_answers: active.multiple_choice_answers.clone().unwrap(),
            created_at: now,
            updated_at: now,
        };

        let back = model.to_normalized().unwrap();
        assert_eq!(back, normalized);
        let decoded =
            util::quiz_schema::decode_blank_values(back.selected_answer.as_deref().unwrap())
                .unwrap();
        assert_eq!(decoded, blanks);
    }

    #[test]
    fn corrupt_multi_select_json_fails_to_decode() {
        let now = Utc::now();
        let model = Model {
            id: 3,
            submission_id: 10,
            question_id: "q3".to_string(),
            question_type: QuestionType::Choice,
            selected_answer: None,
            multiple_choice_answers: Some(serde_json::json!({"not": "an array"})),
            created_at: now,
            updated_at: now,
        };

        assert!(model.to_normalized().is_err());
    }
}
