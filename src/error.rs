//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for the binary edges (CLI, tool server).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a source table cannot be loaded.
///
/// Always fatal for the invocation that triggered the load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Table document not found at the configured path.
    #[error("{table} table not found at {}", path.display())]
    NotFound { table: &'static str, path: PathBuf },
    /// The document exists but could not be read.
    #[error("Failed to read {table} table at {}: {source}", path.display())]
    Read {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not a valid table.
    #[error("Failed to parse {table} table at {}: {error}", path.display())]
    Parse {
        table: &'static str,
        path: PathBuf,
        error: String,
    },
}

/// Error returned when an effect string carries no usable numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid literal for effect value: '{raw}'")]
pub struct ValueParseError {
    /// The effect value token as it appeared in the record.
    pub raw: String,
}

/// Error returned when the bot configuration is incomplete or unreadable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("No {0} configured. Set it in the config file, the environment, or on the command line.")]
    Missing(&'static str),
}

/// Error returned when an invocation could not be answered.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The transport dropped its end before the reply was handed over.
    #[error("reply channel closed before the response was sent")]
    ReplyClosed,
}
