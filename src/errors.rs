use thiserror::Error;

use subcal_config::ConfigError;
use subcal_core::CoreError;
use subcal_domain::DomainError;

/// Error type surfaced by the session facade.
#[derive(Debug, Error)]
pub enum SubcalError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<DomainError> for SubcalError {
    fn from(err: DomainError) -> Self {
        SubcalError::Core(CoreError::Domain(err))
    }
}
