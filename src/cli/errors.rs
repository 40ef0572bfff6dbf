//! CLI-specific error types
//!
//! Every CLI error ends the run with exit code 1.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::SorError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input, range, query or page failure
    #[error(transparent)]
    Sor(#[from] SorError),

    /// stdout could not be written
    #[error("SOR_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    /// Arguments parsed but do not describe a query
    #[error("SOR_CLI_USAGE_ERROR: {0}")]
    Usage(String),
}

impl CliError {
    /// Human-readable message without code or severity
    pub fn message(&self) -> String {
        match self {
            CliError::Config(e) => e.message().to_string(),
            CliError::Sor(e) => e.message().to_string(),
            CliError::Io(e) => e.to_string(),
            CliError::Usage(msg) => msg.clone(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
