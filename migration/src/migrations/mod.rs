pub mod m202602010001_create_quizzes;
pub mod m202602010002_create_quiz_submissions;
pub mod m202602010003_create_quiz_submission_answers;
