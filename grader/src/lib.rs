//! # Grader Library
//!
//! Core logic for validating and auto-grading quiz attempt answers. It checks
//! submitted payloads against their target questions, enforces the attempt
//! timer, and turns a stored answer set into a per-question grade report.
//!
//! ## Key Concepts
//! - **Validation**: an answer payload is accepted only for a question with
//!   the same type tag, then flattened into its storage shape.
//! - **Time limit**: the guard compares an injected clock against the quiz's
//!   global timer and is only consulted when an attempt completes.
//! - **Scoring**: each question type scores independently; short-answer
//!   questions carry no scoring rule and are never auto-graded.

pub mod error;
pub mod scorer;
pub mod time_limit;
pub mod types;
pub mod validator;

/// Rounds a float to two decimal places.
///
/// Every awarded value and total passes through here, so rounding happens in
/// exactly one place.
#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
