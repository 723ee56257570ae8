use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegakError {
    #[error("{field} score must be between 1 and 5, got {value}")]
    ScoreOutOfRange { field: &'static str, value: i64 },

    #[error("no students to summarise")]
    NoData,

    #[error("no student ids left after {last}")]
    IdExhausted { last: u64 },

    #[error("student {id} not found")]
    StudentNotFound { id: u64 },

    #[error("invalid username or password")]
    Unauthorized,

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

pub type SegakResult<T> = Result<T, SegakError>;
