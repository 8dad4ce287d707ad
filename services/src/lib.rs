//! Business logic for quiz attempts.
//!
//! Callers drive the attempt lifecycle through [`AttemptService`] instead of
//! touching entities directly. Every operation takes an injected `now`, so
//! the service never reads the wall clock and timing behavior stays
//! reproducible.

pub mod attempt_service;
pub mod error;

pub use attempt_service::AttemptService;
pub use error::AttemptError;
