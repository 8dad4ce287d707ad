use crate::seed::Seeder;
use async_trait::async_trait;
use db::factories::quiz_factory;
use db::models::quiz::GradingType;
use sea_orm::DatabaseConnection;
use services::AttemptError;

pub struct QuizSeeder;

#[async_trait]
impl Seeder for QuizSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), AttemptError> {
        // Untimed automatic quizzes.
        for _ in 0..4 {
            quiz_factory::make(db).await;
        }

        // One timed automatic quiz and one manually marked quiz.
        quiz_factory::make_with(db, GradingType::Automatic, Some(300)).await;
        quiz_factory::make_with(db, GradingType::Manual, None).await;

        Ok(())
    }
}
