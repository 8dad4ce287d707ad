//! Entity for authored quizzes and their stored page content.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use strum::{Display, EnumString};
use util::quiz_schema::{self, QuizDefinition, QuizPage};

/// How the quiz is graded once an attempt completes.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GradingType {
    /// Scored by the engine at completion.
    #[sea_orm(string_value = "automatic")]
    Automatic,
    /// Completed attempts wait for a person to mark them.
    #[sea_orm(string_value = "manual")]
    Manual,
}

impl Default for GradingType {
    fn default() -> Self {
        Self::Automatic
    }
}

impl From<GradingType> for quiz_schema::GradingType {
    fn from(value: GradingType) -> Self {
        match value {
            GradingType::Automatic => quiz_schema::GradingType::Automatic,
            GradingType::Manual => quiz_schema::GradingType::Manual,
        }
    }
}

impl From<quiz_schema::GradingType> for GradingType {
    fn from(value: quiz_schema::GradingType) -> Self {
        match value {
            quiz_schema::GradingType::Automatic => GradingType::Automatic,
            quiz_schema::GradingType::Manual => GradingType::Manual,
        }
    }
}

/// An authored quiz. The page content lives in the `pages` JSON column; the
/// attempt-relevant settings are broken out into columns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    /// Primary key of the quiz.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Placement of this quiz inside a course module.
    pub module_link_id: i64,

    /// Display title.
    pub title: String,

    /// Grading mode applied at completion.
    pub grading_type: GradingType,

    /// Global attempt timer in seconds. NULL means untimed.
    pub time_limit_seconds: Option<i64>,

    /// Maximum attempts a student may start.
    pub max_attempts: i64,

    /// Authored pages of questions, serialized as JSON.
    pub pages: Json,

    /// Timestamp when the quiz was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the quiz was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Reassembles the stored columns and page JSON into a typed definition.
    pub fn definition(&self) -> Result<QuizDefinition, serde_json::Error> {
        let pages: Vec<QuizPage> = serde_json::from_value(self.pages.clone())?;
        Ok(QuizDefinition {
            grading_type: self.grading_type.clone().into(),
            time_limit_seconds: self.time_limit_seconds,
            max_attempts: self.max_attempts,
            pages,
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Attempts made against this quiz.
    #[sea_orm(has_many = "super::quiz_submission::Entity")]
    QuizSubmissions,
}

impl Related<super::quiz_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::{ActiveModelTrait, Set};
    use util::quiz_schema::QuestionType;

    #[tokio::test]
    async fn stored_pages_round_trip_through_definition() {
        let db = setup_test_db().await;
        let now = Utc::now();

        let pages = serde_json::json!([
            {
                "title": "Page one",
                "questions": [
                    {
                        "type": "multiple-choice",
                        "id": "q1",
                        "prompt": "Pick one",
                        "options": {"a": "first", "b": "second"},
                        "correct_answer": "b",
                        "scoring": {"points": 100.0}
                    }
                ]
            }
        ]);

        let quiz = ActiveModel {
            module_link_id: Set(7),
            title: Set("Week 1 checkpoint".to_string()),
            grading_type: Set(GradingType::Automatic),
            time_limit_seconds: Set(Some(600)),
            max_attempts: Set(3),
            pages: Set(pages),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to insert quiz");

        let stored = Entity::find_by_id(quiz.id)
            .one(&db)
            .await
            .expect("Failed to query quiz")
            .expect("quiz should exist");

        let definition = stored.definition().expect("pages should decode");
        assert_eq!(definition.time_limit_seconds, Some(600));
        assert_eq!(definition.max_attempts, 3);
        assert_eq!(definition.question_count(), 1);
        assert_eq!(
            definition.question("q1").map(|q| q.question_type()),
            Some(QuestionType::MultipleChoice)
        );
        assert!(definition.validate().is_ok());
    }
}
