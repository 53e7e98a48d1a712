use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::prelude::PolarsError> for DashError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        DashError::Polars(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
