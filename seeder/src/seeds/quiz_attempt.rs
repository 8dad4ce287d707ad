use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::quiz;
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use sea_orm::{DatabaseConnection, EntityTrait};
use services::{AttemptError, AttemptService};
use util::quiz_schema::{AnswerInput, Question};

pub struct QuizAttemptSeeder;

#[async_trait]
impl Seeder for QuizAttemptSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), AttemptError> {
        let quizzes = quiz::Entity::find().all(db).await?;
        let service = AttemptService::new(db.clone());

        for quiz in &quizzes {
            let definition = quiz.definition()?;

            for student_id in 1..=3i64 {
                let attempt_number = service.next_attempt_number(quiz.id, student_id).await?;
                let started = Utc::now();
                let submission = service
                    .start_attempt(quiz.id, student_id, 100 + student_id, attempt_number, started)
                    .await?;

                let mut clock = started;
                for question in definition.questions() {
                    if fastrand::u8(..10) < 8 {
                        clock += Duration::seconds(fastrand::i64(5..40));
                        service
                            .answer_question(
                                submission.id,
                                question.id(),
                                answer_for(question),
                                clock,
                            )
                            .await?;
                    }
                }

                // Leave roughly a third of the attempts open.
                if fastrand::u8(..3) == 0 {
                    continue;
                }

                let finish = clock + Duration::seconds(fastrand::i64(10..400));
                match service.complete_attempt(submission.id, finish).await {
                    Ok(_) => {}
                    // Timed quizzes may legitimately run out; the attempt
                    // stays open.
                    Err(AttemptError::TimeLimitExceeded(_)) => {}
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(())
    }
}

fn answer_for(question: &Question) -> AnswerInput {
    match question {
        Question::MultipleChoice { options, .. } => {
            let keys: Vec<&String> = options.keys().collect();
            AnswerInput::MultipleChoice {
                value: keys[fastrand::usize(..keys.len())].clone(),
            }
        }
        Question::ShortAnswer { .. } => AnswerInput::ShortAnswer {
            value: Sentence(3..8).fake(),
        },
        Question::Choice {
            options,
            correct_answers,
            ..
        } => {
            let value = if fastrand::bool() {
                correct_answers.iter().cloned().collect()
            } else {
                options
                    .keys()
                    .filter(|_| fastrand::bool())
                    .cloned()
                    .collect()
            };
            AnswerInput::Choice { value }
        }
        Question::FillInTheBlank {
            correct_answers, ..
        } => {
            let mut filled = correct_answers.clone();
            if fastrand::bool() {
                if let Some(name) = filled.keys().next().cloned() {
                    filled.insert(name, "not quite".to_string());
                }
            }
            AnswerInput::FillInTheBlank { value: filled }
        }
    }
}
