//! Error types for the dispatcher

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Log file could not be opened for append
    #[error("cannot open '{}' for append: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Severity text that is neither a valid ordinal nor a level name
    #[error("Failed to set log level to: {input}")]
    InvalidLevel { input: String },

    /// Configuration value that could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },

    /// A sink reported a failure of its own
    #[error("Sink '{name}' failed: {message}")]
    Sink { name: String, message: String },

    /// The consumer thread could not be started
    #[error("Failed to spawn dispatcher worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The process-wide dispatcher was already initialized
    #[error("Global dispatcher already initialized")]
    AlreadyInitialized,
}

impl LoggerError {
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_level(input: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            input: input.into(),
        }
    }

    pub fn invalid_setting(key: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::InvalidSetting {
            key: key.into(),
            value: value.into(),
        }
    }

    /// For custom sinks reporting a failure from `write` or `flush`.
    pub fn sink(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Sink {
            name: name.into(),
            message: message.into(),
        }
    }
}
