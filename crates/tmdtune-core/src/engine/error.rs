use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown optimization algorithm: '{name}'")]
    UnknownAlgorithm { name: String },

    #[error("Optimization algorithm '{algorithm}' is not implemented yet")]
    NotImplemented { algorithm: &'static str },

    #[error("Expected {expected} optimized parameters, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
