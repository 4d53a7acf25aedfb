use models::EntityKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("Not a JSON")]
    NotAJson,
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Storage(e.to_string())
    }
}
