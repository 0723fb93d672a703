// src/internal/logger/logger.rs

use std::fmt::Display;
use std::io::{self, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::{Local, NaiveDate};
use tracing::Dispatch;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, time::ChronoLocal, writer::BoxMakeWriter},
    layer::SubscriberExt,
    Layer,
};

use super::error::LoggingError;
use super::sink::{open_log_file, LogFile};
use crate::internal::config::{LoggingConfig, DEFAULT_LOG_DIR};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// A named logger writing every record to the console and to a JSON file.
///
/// Cloning is cheap; all clones share the same sinks.
#[derive(Clone, Debug)]
pub struct Logger {
    name: Arc<str>,
    level: LevelFilter,
    console: bool,
    dispatch: Dispatch,
    file: Option<LogFile>,
}

impl Logger {
    pub fn builder(module_name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(module_name)
    }

    /// A logger that discards every record
    pub fn disabled() -> Self {
        Self {
            name: Arc::from(""),
            level: LevelFilter::OFF,
            console: false,
            dispatch: Dispatch::none(),
            file: None,
        }
    }

    /// Module name attached to every record as the `logger` field
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Path of the JSON log file, if the file sink is enabled
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(LogFile::path)
    }

    /// Run `f` with this logger as the thread's default subscriber, so plain
    /// `tracing` macros inside `f` reach both sinks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Flush the console and push the log file to disk
    pub fn sync(&self) -> Result<(), LoggingError> {
        if self.console {
            io::stdout().flush().map_err(LoggingError::Sync)?;
        }
        if let Some(file) = &self.file {
            file.sync().map_err(LoggingError::Sync)?;
        }
        Ok(())
    }

    /// Call `f` once; if it fails, log the error together with the caller's location.
    ///
    /// The call site of this method is recorded in the `caller` field. The
    /// record's `filename`/`line_number` (and the console's `file:line`) name
    /// the place inside this crate that emits the record, not the call site.
    #[track_caller]
    pub fn execute_and_log_error<T, E, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let caller = Location::caller();
        match f() {
            Ok(value) => Some(value),
            Err(err) => {
                crate::log_error!(
                    self,
                    error = %err,
                    caller = %caller,
                    "an error occurred while executing the function"
                );
                None
            }
        }
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    name: String,
    base_path: Option<String>,
    log_dir: PathBuf,
    level: LevelFilter,
    caller: bool,
    color: bool,
    console: bool,
    file: bool,
    console_writer: Option<BoxMakeWriter>,
    date: Option<NaiveDate>,
}

impl LoggerBuilder {
    fn new(module_name: impl Into<String>) -> Self {
        Self {
            name: module_name.into(),
            base_path: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            level: LevelFilter::INFO,
            caller: true,
            color: true,
            console: true,
            file: true,
            console_writer: None,
            date: None,
        }
    }

    /// File name prefix; defaults to the module name
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn file(mut self, enabled: bool) -> Self {
        self.file = enabled;
        self
    }

    /// Replace stdout as the console destination
    pub fn console_writer(mut self, writer: BoxMakeWriter) -> Self {
        self.console_writer = Some(writer);
        self
    }

    /// Day used for the file name suffix; defaults to today in local time
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn apply_config(self, cfg: &LoggingConfig) -> Result<Self, LoggingError> {
        let level = parse_level(&cfg.level)?;
        Ok(self
            .level(level)
            .log_dir(&cfg.log_dir)
            .with_caller(cfg.caller)
            .with_color(cfg.color)
            .console(cfg.console)
            .file(cfg.file))
    }

    /// [`LoggerBuilder::apply_config`] with settings read from a config file
    pub fn apply_config_file(self, path: impl AsRef<Path>) -> Result<Self, LoggingError> {
        let cfg = LoggingConfig::load(path)?;
        self.apply_config(&cfg)
    }

    pub fn build(self) -> Result<Logger, LoggingError> {
        let LoggerBuilder {
            name,
            base_path,
            log_dir,
            level,
            caller,
            color,
            console,
            file,
            console_writer,
            date,
        } = self;

        let log_file = if file {
            let base = base_path.as_deref().unwrap_or(&name);
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            Some(open_log_file(&log_dir, base, date)?)
        } else {
            None
        };

        let console_layer = console.then(|| {
            let writer = console_writer.unwrap_or_else(|| BoxMakeWriter::new(io::stdout));
            fmt::layer()
                .with_writer(writer)
                .with_ansi(color)
                .with_timer(ChronoLocal::rfc_3339())
                .with_level(true)
                .with_target(false)
                .with_file(caller)
                .with_line_number(caller)
                .with_filter(level)
        });

        let file_layer = log_file.clone().map(|writer| {
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(ChronoLocal::rfc_3339())
                .with_level(true)
                .with_target(true)
                .with_file(caller)
                .with_line_number(caller)
                .with_filter(level)
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        Ok(Logger {
            name: Arc::from(name),
            level,
            console,
            dispatch: Dispatch::new(subscriber),
            file: log_file,
        })
    }
}

/// Parse a level name (case-insensitive) such as `info` or `WARN`.
///
/// Only trace, debug, info, warn, error and off are accepted; numeric levels
/// and the empty string are rejected.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let name = level.trim().to_ascii_lowercase();
    match name.as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(LoggingError::InvalidLevel(level.to_string())),
    }
}

/// Initialize the process-wide logger with the default configuration.
///
/// Panics if the log directory cannot be created or the log file cannot be
/// opened. Later calls return the logger built by the first one.
pub fn init(module_name: &str, base_path: &str) -> &'static Logger {
    init_with_config(module_name, base_path, &LoggingConfig::default())
}

pub fn init_with_config(module_name: &str, base_path: &str, cfg: &LoggingConfig) -> &'static Logger {
    GLOBAL.get_or_init(|| {
        let logger = Logger::builder(module_name)
            .base_path(base_path)
            .apply_config(cfg)
            .and_then(LoggerBuilder::build)
            .unwrap_or_else(|err| panic!("failed to initialize log file writer: {err}"));

        // plain tracing macros elsewhere in the process land in the same sinks
        if let Err(e) = tracing::dispatcher::set_global_default(logger.dispatch.clone()) {
            eprintln!("Not routing plain tracing events to {}: {}", logger.name(), e);
        }

        logger
    })
}

/// The process-wide logger, or a disabled one before [`init`] ran
pub fn global() -> &'static Logger {
    static DISABLED: OnceLock<Logger> = OnceLock::new();
    GLOBAL
        .get()
        .unwrap_or_else(|| DISABLED.get_or_init(Logger::disabled))
}

/// [`Logger::sync`] on the process-wide logger
pub fn sync() -> Result<(), LoggingError> {
    global().sync()
}

/// [`Logger::execute_and_log_error`] on the process-wide logger
#[track_caller]
pub fn execute_and_log_error<T, E, F>(f: F) -> Option<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    global().execute_and_log_error(f)
}

// Leveled logging macros. The first argument is the logger (anything that
// derefs to `&Logger`), the rest is `tracing` event syntax:
//
//     log_info!(logger, user_id = 42, path = %req.path, "request served");
//
// The JSON sink flattens fields next to `timestamp`, `level`, `message`,
// `target`, `filename`, `line_number` and `logger`. A user field reusing one of
// those names is written as a second key with the same name, and JSON readers
// usually keep only the last one.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_event {
    ($logger:expr, $level:ident, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        logger.in_scope(|| {
            $crate::tracing::event!(
                $crate::tracing::Level::$level,
                logger = logger.name(),
                $($arg)+
            )
        })
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_event!($logger, DEBUG, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_event!($logger, INFO, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_event!($logger, WARN, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_event!($logger, ERROR, $($arg)+)
    };
}
