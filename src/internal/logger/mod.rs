// src/internal/logger/mod.rs

pub mod error;
pub mod logger;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod sink;

pub use error::LoggingError;
pub use logger::{
    execute_and_log_error, global, init, init_with_config, parse_level, sync, Logger,
    LoggerBuilder,
};
pub use sink::log_file_name;

// The log_* macros are exported at the crate root via #[macro_export]
