pub mod quiz;
pub mod quiz_submission;
pub mod quiz_submission_answer;

pub use quiz::Entity as Quiz;
pub use quiz_submission::Entity as QuizSubmission;
pub use quiz_submission_answer::Entity as QuizSubmissionAnswer;
