use std::path::PathBuf;

use thiserror::Error;

use crate::model::task::Status;

pub type Result<T, E = TaskError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Wrong argument count, a non-integer id, or an empty description.
    #[error("{message}")]
    Argument { message: String, usage: &'static str },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but does not hold a valid task collection.
    #[error("Corrupt task file {}: {message}", path.display())]
    CorruptData { path: PathBuf, message: String },

    #[error("{}", empty_message(.0))]
    EmptyResult(Option<Status>),

    #[error("Task with ID {0} not found")]
    NotFound(u32),

    #[error("No task IDs left: the highest ID is already {}", u32::MAX)]
    IdsExhausted,
}

fn empty_message(filter: &Option<Status>) -> String {
    match filter {
        None => "No tasks yet".to_string(),
        Some(status) => format!("No tasks with status {}", status),
    }
}

impl TaskError {
    pub fn argument(message: impl Into<String>, usage: &'static str) -> Self {
        TaskError::Argument {
            message: message.into(),
            usage,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }

    /// Usage form to show alongside the message, if the error came from a malformed command.
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            TaskError::Argument { usage, .. } => Some(usage),
            _ => None,
        }
    }
}
