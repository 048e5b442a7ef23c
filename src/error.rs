// error.rs

use crate::todo::TodoId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("no todo is selected for update")]
    NoSelection,
    #[error("todo {0} does not exist")]
    TodoNotFound(TodoId),
    #[error("unknown input field `{0}`")]
    UnknownField(String),
}
