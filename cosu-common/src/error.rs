//! Common error types for Cos_u

use thiserror::Error;

/// Common result type for Cos_u operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Cos_u crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exam identifier outside the supported set
    #[error("Unknown exam type: {0} (expected one of toefl, ielts, pte, duolingo)")]
    UnknownExam(String),

    /// Task identifier not registered for the exam
    #[error("Unknown task type '{task}' for exam {exam}")]
    UnknownTask { exam: String, task: String },
}
