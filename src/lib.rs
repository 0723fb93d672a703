pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::LoggingConfig;
pub use internal::logger::{
    execute_and_log_error, global, init, init_with_config, log_file_name, sync, Logger,
    LoggerBuilder, LoggingError,
};

// Used by the log_* macros
#[doc(hidden)]
pub use tracing;
