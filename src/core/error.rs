use crate::infrastructure::database::StoreError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("message not found")]
    NotFound,

    #[error("content rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
