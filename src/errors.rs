//! Typed errors for the task tracker.
//!
//! `TaskError` covers every failure a user can trigger from the menu or the
//! subcommands. Storage plumbing errors travel as `anyhow::Error` and are
//! wrapped in `TaskError::Storage` at the service boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid duration '{input}': {reason} (expected HH:MM:SS)")]
    InvalidDuration { input: String, reason: String },

    #[error("Invalid priority '{0}'. Valid values: Low, Medium, High")]
    InvalidPriority(String),

    #[error("Invalid recurrence '{0}'. Valid values: daily, weekly")]
    InvalidRecurrence(String),

    #[error("Task name must not be empty")]
    EmptyName,

    #[error("Task {id} not found or already completed")]
    TaskNotFound { id: i64 },

    #[error("Invalid selection '{0}'")]
    InvalidSelection(String),

    #[error("Storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl From<rusqlite::Error> for TaskError {
    fn from(err: rusqlite::Error) -> Self {
        TaskError::Storage(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_not_found_carries_id() {
        let err = TaskError::TaskNotFound { id: 7 };
        match &err {
            TaskError::TaskNotFound { id } => assert_eq!(*id, 7),
            _ => panic!("Expected TaskNotFound"),
        }
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn invalid_duration_mentions_expected_format() {
        let err = TaskError::InvalidDuration {
            input: "1:2".into(),
            reason: "expected 3 fields".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1:2"));
        assert!(msg.contains("HH:MM:SS"));
    }

    #[test]
    fn sqlite_errors_convert_to_storage() {
        let err: TaskError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, TaskError::Storage(_)));
    }

    #[test]
    fn task_error_implements_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&TaskError::EmptyName);
    }
}
