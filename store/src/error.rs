use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Local storage error: {0}")]
    LocalStorage(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
