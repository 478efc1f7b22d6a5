use thiserror::Error;

use crate::domain::types::{TypeConstraintError, VisitMonth};
use crate::repository::errors::RepositoryError;

pub mod client;
pub mod contract;
pub mod folder;
pub mod generator;
pub mod visit;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The contract is not in the state the operation requires.
    #[error("contract is not in the required state")]
    InvalidState,

    /// The requested month lies outside the contract period.
    #[error("{0} is outside the contract period")]
    OutOfRange(VisitMonth),

    #[error("Entity not found")]
    NotFound,

    /// User input failed validation.
    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            err => ServiceError::Repository(err),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}
