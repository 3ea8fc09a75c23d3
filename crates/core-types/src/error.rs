use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("status must be 'active' or 'inactive', got '{0}'")]
    InvalidStatus(String),

    #[error("id must be a positive integer, got {0}")]
    InvalidId(i64),
}
