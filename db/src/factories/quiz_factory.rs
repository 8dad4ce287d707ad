use crate::models::quiz::{self, GradingType};
use chrono::Utc;
use fake::{Fake, faker::lorem::en::Words};
use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::collections::{BTreeMap, BTreeSet};
use util::quiz_schema::{CreditPolicy, Question, QuizPage, ScoringRule};

/// Canonical two-page definition with one question of each type.
pub fn sample_pages() -> Vec<QuizPage> {
    let mc_options: BTreeMap<String, String> = [("a", "12"), ("b", "14"), ("c", "16")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let choice_options: BTreeMap<String, String> =
        [("a", "2"), ("b", "3"), ("c", "4"), ("d", "5")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

    let primes: BTreeSet<String> = ["a", "b", "d"].iter().map(|s| s.to_string()).collect();

    let blanks: BTreeMap<String, String> = [("country", "France"), ("capital", "Paris")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    vec![
        QuizPage {
            title: Some("Selection".to_string()),
            questions: vec![
                Question::MultipleChoice {
                    id: "q1".to_string(),
                    prompt: "What is 7 + 7?".to_string(),
                    options: mc_options,
                    correct_answer: "b".to_string(),
                    scoring: ScoringRule {
                        points: 100.0,
                        credit: CreditPolicy::AllOrNothing,
                    },
                },
                Question::Choice {
                    id: "q2".to_string(),
                    prompt: "Select every prime number".to_string(),
                    options: choice_options,
                    correct_answers: primes,
                    scoring: ScoringRule {
                        points: 10.0,
                        credit: CreditPolicy::Partial,
                    },
                },
            ],
        },
        QuizPage {
            title: Some("Written".to_string()),
            questions: vec![
                Question::FillInTheBlank {
                    id: "q3".to_string(),
                    prompt: "The capital of {country} is {capital}".to_string(),
                    correct_answers: blanks,
                    scoring: ScoringRule {
                        points: 4.0,
                        credit: CreditPolicy::AllOrNothing,
                    },
                },
                Question::ShortAnswer {
                    id: "q4".to_string(),
                    prompt: "Explain why the sky is blue".to_string(),
                    correct_answer: "Rayleigh scattering".to_string(),
                },
            ],
        },
    ]
}

/// Inserts a quiz with the canonical sample pages and returns it.
pub async fn make(db: &DatabaseConnection) -> quiz::Model {
    make_with(db, GradingType::Automatic, None).await
}

/// Inserts a quiz with the given grading mode and timer and returns it.
pub async fn make_with(
    db: &DatabaseConnection,
    grading_type: GradingType,
    time_limit_seconds: Option<i64>,
) -> quiz::Model {
    let words: Vec<String> = Words(2..4).fake();
    let now = Utc::now();
    let pages = serde_json::to_value(sample_pages()).expect("Failed to serialize sample pages");
    let module_link_id = rand::thread_rng().gen_range(1..=9999i64);

    quiz::ActiveModel {
        module_link_id: Set(module_link_id),
        title: Set(words.join(" ")),
        grading_type: Set(grading_type),
        time_limit_seconds: Set(time_limit_seconds),
        max_attempts: Set(3),
        pages: Set(pages),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create quiz")
}
