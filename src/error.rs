use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Unknown action label: {0}")]
    UnknownAction(String),

    #[error("Unknown spot key: {0}")]
    UnknownSpot(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Dataset file not found: {0}")]
    DatasetNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type TrainerResult<T> = Result<T, TrainerError>;
