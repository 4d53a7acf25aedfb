use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
