use std::result::Result as StdResult;

use dhub_config::ConfigError;
use dhub_core::CoreError;
use thiserror::Error;

/// Unified error type for the session layer above the ledger crates.
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = StdResult<T, HubError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for HubError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => HubError::InvalidInput(message),
            CoreError::NotFound(id) => HubError::NotFound(format!("record {id}")),
            CoreError::ReceiptNotFound(key) => HubError::NotFound(format!("receipt {key}")),
            CoreError::Persistence(message) | CoreError::Serde(message) => {
                HubError::Storage(message)
            }
            CoreError::LockPoisoned => HubError::Storage("ledger lock poisoned".into()),
            CoreError::Io(err) => HubError::Storage(err.to_string()),
        }
    }
}

impl From<ConfigError> for HubError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => HubError::Storage(io.to_string()),
            ConfigError::Serde(message) => HubError::Config(message),
            invalid @ ConfigError::InvalidValue { .. } => HubError::InvalidInput(invalid.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Hub(HubError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Hub(HubError::from(err))
    }
}
