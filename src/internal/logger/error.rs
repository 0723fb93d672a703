use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to sync log output: {0}")]
    Sync(#[source] std::io::Error),
}
