// linkbox/src/domain/error.rs
use crate::domain::bookmark::BookmarkBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Payload is not a list of bookmark records
    #[error("invalid data format")]
    InvalidDataFormat,

    /// At least one record lacks a title or url
    #[error("invalid bookmark data exists")]
    InvalidBookmarkData,

    #[error("Invalid caller: {0}")]
    InvalidCaller(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    /// Storage failure, carries the storage layer's own message
    #[error("{0}")]
    RepositoryError(String),

    #[error("Cannot reach server: {0}")]
    ServerUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            DomainError::Io(e) => DomainError::Other(format!("{}: {}", context.into(), e)),
            err => err,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<BookmarkBuilderError> for DomainError {
    fn from(e: BookmarkBuilderError) -> Self {
        DomainError::Other(format!("Cannot build bookmark: {}", e))
    }
}
