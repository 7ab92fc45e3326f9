use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt label data: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
