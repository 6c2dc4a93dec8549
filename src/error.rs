use crate::ids::{ProjectId, TaskId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Raised when a status or priority label is not one of the known values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

pub type ModelResult<T> = Result<T, ModelError>;
