use sea_orm::{DbErr, TransactionError};

use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError<DirectoryError>> for DirectoryError {
    fn from(err: TransactionError<DirectoryError>) -> Self {
        match err {
            TransactionError::Connection(e) => DirectoryError::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
