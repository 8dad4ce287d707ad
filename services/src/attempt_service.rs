//! Attempt lifecycle operations.
//!
//! A submission moves `in_progress -> completed` exactly once. Answering and
//! completing both require an `in_progress` row; the status flip itself is a
//! conditional update so concurrent completions cannot both win. Grading for
//! automatic quizzes happens before the flip, and a grading failure leaves
//! the attempt in progress.

use crate::error::AttemptError;
use chrono::{DateTime, Utc};
use db::models::quiz_submission::SubmissionStatus;
use db::models::{quiz, quiz_submission, quiz_submission_answer};
use grader::types::GradeReport;
use grader::{scorer, time_limit, validator};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::{error, info};
use util::quiz_schema::{AnswerInput, QuizDefinition};

pub struct AttemptService {
    db: DatabaseConnection,
}

impl AttemptService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a new attempt against a quiz.
    ///
    /// The row starts `in_progress` with `started_at = now` and no recorded
    /// answers or scores. Attempt numbers are caller-allocated (see
    /// [`next_attempt_number`](Self::next_attempt_number)); a duplicate
    /// `(quiz, student, attempt_number)` triple trips the unique index and
    /// surfaces as [`AttemptError::Database`].
    pub async fn start_attempt(
        &self,
        quiz_id: i64,
        student_id: i64,
        enrollment_id: i64,
        attempt_number: i64,
        now: DateTime<Utc>,
    ) -> Result<quiz_submission::Model, AttemptError> {
        if attempt_number < 1 {
            return Err(AttemptError::Validation(
                "attempt_number must be at least 1".to_string(),
            ));
        }

        let quiz = quiz::Entity::find_by_id(quiz_id)
            .one(&self.db)
            .await?
            .ok_or(AttemptError::NotFound("quiz"))?;

        let submission = quiz_submission::ActiveModel {
            quiz_id: Set(quiz.id),
            student_id: Set(student_id),
            enrollment_id: Set(enrollment_id),
            attempt_number: Set(attempt_number),
            status: Set(SubmissionStatus::InProgress),
            started_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(submission)
    }

    /// Next free attempt number for a student on a quiz: highest existing
    /// number plus one, or 1 when the student has no attempts yet.
    pub async fn next_attempt_number(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<i64, AttemptError> {
        let latest = quiz_submission::Entity::find()
            .filter(quiz_submission::Column::QuizId.eq(quiz_id))
            .filter(quiz_submission::Column::StudentId.eq(student_id))
            .order_by_desc(quiz_submission::Column::AttemptNumber)
            .one(&self.db)
            .await?;

        Ok(latest.map_or(1, |s| s.attempt_number + 1))
    }

    /// Records an answer for one question of an in-progress attempt.
    ///
    /// The payload is validated against the question's type tag, then
    /// upserted on `(submission_id, question_id)`: a first answer appends, a
    /// re-answer replaces the stored payload in place and keeps the row's
    /// position. Returns the attempt's full answer set in first-answer order.
    pub async fn answer_question(
        &self,
        submission_id: i64,
        question_id: &str,
        answer: AnswerInput,
        now: DateTime<Utc>,
    ) -> Result<Vec<quiz_submission_answer::Model>, AttemptError> {
        if question_id.trim().is_empty() {
            return Err(AttemptError::Validation(
                "question_id must not be empty".to_string(),
            ));
        }

        let submission = self.load_in_progress(submission_id).await?;
        let (_, definition) = self.load_quiz(submission.quiz_id).await?;
        let question = definition
            .question(question_id)
            .ok_or(AttemptError::NotFound("question"))?;
        let normalized = validator::validate(question, &answer)?;

        let row = quiz_submission_answer::ActiveModel::from_normalized(
            submission.id,
            question_id,
            &normalized,
            now,
        );
        quiz_submission_answer::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    quiz_submission_answer::Column::SubmissionId,
                    quiz_submission_answer::Column::QuestionId,
                ])
                .update_columns([
                    quiz_submission_answer::Column::QuestionType,
                    quiz_submission_answer::Column::SelectedAnswer,
                    quiz_submission_answer::Column::MultipleChoiceAnswers,
                    quiz_submission_answer::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        self.answers_for(submission.id).await
    }

    /// Finalizes an in-progress attempt.
    ///
    /// The timer is checked first; an attempt past its limit stays
    /// `in_progress` and ungraded. Automatic quizzes are graded next, and
    /// only then does a conditional update flip the status, stamp
    /// `submitted_at` and the fractional minutes spent, and (for automatic
    /// quizzes) write the earned and total points. If another completion won
    /// the race in the meantime the update matches no row and the call
    /// reports [`AttemptError::InvalidState`].
    pub async fn complete_attempt(
        &self,
        submission_id: i64,
        now: DateTime<Utc>,
    ) -> Result<quiz_submission::Model, AttemptError> {
        let submission = self.load_in_progress(submission_id).await?;
        let (quiz, definition) = self.load_quiz(submission.quiz_id).await?;

        if let Err(exceeded) =
            time_limit::check_within_limit(&definition, submission.started_at, now)
        {
            info!(
                submission_id = submission.id,
                elapsed_seconds = exceeded.elapsed_seconds,
                limit_seconds = exceeded.limit_seconds,
                "completion refused, time limit exceeded"
            );
            return Err(exceeded.into());
        }

        let report = match quiz.grading_type {
            quiz::GradingType::Automatic => Some(self.grade(&definition, submission.id).await?),
            quiz::GradingType::Manual => None,
        };

        let elapsed_ms = (now - submission.started_at).num_milliseconds();
        let time_spent_minutes = (elapsed_ms as f64 / 60_000.0).max(0.0);

        let mut update = quiz_submission::Entity::update_many()
            .col_expr(
                quiz_submission::Column::Status,
                Expr::value(SubmissionStatus::Completed),
            )
            .col_expr(quiz_submission::Column::SubmittedAt, Expr::value(now))
            .col_expr(
                quiz_submission::Column::TimeSpentMinutes,
                Expr::value(time_spent_minutes),
            )
            .col_expr(quiz_submission::Column::UpdatedAt, Expr::value(now));
        if let Some(report) = &report {
            update = update
                .col_expr(
                    quiz_submission::Column::Earned,
                    Expr::value(report.total_score),
                )
                .col_expr(
                    quiz_submission::Column::Total,
                    Expr::value(report.max_score),
                );
        }

        let result = update
            .filter(quiz_submission::Column::Id.eq(submission.id))
            .filter(quiz_submission::Column::Status.eq(SubmissionStatus::InProgress))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AttemptError::InvalidState);
        }

        quiz_submission::Entity::find_by_id(submission.id)
            .one(&self.db)
            .await?
            .ok_or(AttemptError::NotFound("submission"))
    }

    async fn load_in_progress(
        &self,
        submission_id: i64,
    ) -> Result<quiz_submission::Model, AttemptError> {
        let submission = quiz_submission::Entity::find_by_id(submission_id)
            .one(&self.db)
            .await?
            .ok_or(AttemptError::NotFound("submission"))?;
        if submission.is_completed() {
            return Err(AttemptError::InvalidState);
        }
        Ok(submission)
    }

    async fn load_quiz(
        &self,
        quiz_id: i64,
    ) -> Result<(quiz::Model, QuizDefinition), AttemptError> {
        let quiz = quiz::Entity::find_by_id(quiz_id)
            .one(&self.db)
            .await?
            .ok_or(AttemptError::NotFound("quiz"))?;
        let definition = quiz.definition().map_err(|err| {
            error!(quiz_id = quiz.id, error = %err, "stored quiz definition is not decodable");
            AttemptError::from(err)
        })?;
        Ok((quiz, definition))
    }

    async fn answers_for(
        &self,
        submission_id: i64,
    ) -> Result<Vec<quiz_submission_answer::Model>, AttemptError> {
        Ok(quiz_submission_answer::Entity::find()
            .filter(quiz_submission_answer::Column::SubmissionId.eq(submission_id))
            .order_by_asc(quiz_submission_answer::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn grade(
        &self,
        definition: &QuizDefinition,
        submission_id: i64,
    ) -> Result<GradeReport, AttemptError> {
        let rows = self.answers_for(submission_id).await?;
        let mut answers = HashMap::with_capacity(rows.len());
        for row in &rows {
            let normalized = row.to_normalized().map_err(|err| {
                error!(
                    submission_id,
                    question_id = %row.question_id,
                    error = %err,
                    "stored answer row is not decodable"
                );
                AttemptError::from(err)
            })?;
            answers.insert(row.question_id.clone(), normalized);
        }
        Ok(scorer::grade_submission(definition, &answers)?)
    }
}
