use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202602010001_create_quizzes::Migration),
            Box::new(migrations::m202602010002_create_quiz_submissions::Migration),
            Box::new(migrations::m202602010003_create_quiz_submission_answers::Migration),
        ]
    }
}
