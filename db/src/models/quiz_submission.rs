//! Entity and lifecycle states for quiz attempt submissions.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use strum::{Display, EnumString};

/// Lifecycle state of an attempt. An attempt with no row is "not started";
/// `Completed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SubmissionStatus {
    /// The student may still answer and complete.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Finalized. Nothing mutates the attempt from here on.
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One student's attempt against a quiz.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_submissions")]
pub struct Model {
    /// Primary key of the submission.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// ID of the quiz being attempted.
    pub quiz_id: i64,

    /// ID of the student making the attempt.
    pub student_id: i64,

    /// ID of the enrollment the attempt is counted under.
    pub enrollment_id: i64,

    /// 1-based attempt counter, unique per quiz and student.
    pub attempt_number: i64,

    /// Current lifecycle state.
    pub status: SubmissionStatus,

    /// When the attempt was started.
    pub started_at: DateTime<Utc>,

    /// When the attempt was completed. NULL while in progress.
    pub submitted_at: Option<DateTime<Utc>>,

    /// Fractional minutes between start and completion.
    pub time_spent_minutes: Option<f64>,

    /// Points earned by auto-grading. NULL while ungraded.
    pub earned: Option<f64>,

    /// Maximum points available to auto-grading. NULL while ungraded.
    pub total: Option<f64>,

    /// Timestamp when the submission was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the submission was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.status == SubmissionStatus::Completed
    }

    /// Gradebook percentage: earned over total, times 100. Returns `0.0`
    /// while ungraded or when the maximum is zero.
    pub fn percentage(&self) -> f64 {
        match (self.earned, self.total) {
            (Some(earned), Some(total)) if total > 0.0 => (earned * 100.0) / total,
            _ => 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Link to the quiz being attempted.
    #[sea_orm(
        belongs_to = "super::quiz::Entity",
        from = "Column::QuizId",
        to = "super::quiz::Column::Id"
    )]
    Quiz,

    /// Answers recorded for this attempt.
    #[sea_orm(has_many = "super::quiz_submission_answer::Entity")]
    QuizSubmissionAnswers,
}

impl Related<super::quiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::quiz_submission_answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizSubmissionAnswers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
