use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Venice error: {0}")]
    Venice(#[from] venice_sdk::VeniceError),
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
