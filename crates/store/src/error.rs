//! Store-level failures.

use thiserror::Error;

use stocklet_core::DomainError;

/// Failure raised by a record collection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A collection lock was poisoned by a panicking writer.
    #[error("collection lock poisoned")]
    Poisoned,

    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,

    /// A record with the same id already exists.
    #[error("duplicate record id")]
    Duplicate,
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Poisoned => DomainError::persistence("collection lock poisoned"),
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Duplicate => DomainError::conflict("duplicate record id"),
        }
    }
}
