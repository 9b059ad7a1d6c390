//! Model-related error types.

use thiserror::Error;

/// Errors that can occur while building a classifier or its optimizer.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Scheduler {name} not implemented")]
    SchedulerNotImplemented { name: String },

    #[error("Invalid classifier spec: {message}")]
    InvalidSpec { message: String },
}
