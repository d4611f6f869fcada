//! Structured logging for the cache engine and the `cnb` binary
//!
//! ```rust
//! use cnb::logger::{self, LogTag};
//!
//! logger::info(LogTag::Cache, "Engine opened");
//! logger::debug(LogTag::Index, "Evicted oldest row"); // only with debug enabled for Index
//! ```
//!
//! Output goes to stderr, leaving stdout free for command output.
//! Call `logger::init_with(...)` once at startup; without it the default
//! configuration (Info and above, no debug tags) applies.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from command-line verbosity switches
///
/// `debug` enables debug output for every tag, `verbose` additionally lowers
/// the threshold to Verbose. An explicit `level` overrides the threshold.
pub fn init_with(debug: bool, verbose: bool, level: Option<LogLevel>) {
    set_logger_config(config_from_flags(debug, verbose, level));
}

fn config_from_flags(debug: bool, verbose: bool, level: Option<LogLevel>) -> LoggerConfig {
    let mut config = LoggerConfig::default();
    if debug || verbose {
        config.min_level = LogLevel::Debug;
        config.debug_all = true;
    }
    if verbose {
        config.min_level = LogLevel::Verbose;
    }
    if let Some(level) = level {
        config.min_level = level;
    }
    config
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (only when debug is enabled for the tag)
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with verbose output)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
