#![deny(missing_docs)]
//! Shared logging utilities for the AutoFlow workspace.
//!
//! This crate provides the `flow_*` logging macros used across the codebase,
//! the logger initialization used by binaries, and a minimal test initializer
//! for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file written by [`initialize`] when a file destination is chosen.
pub const DEFAULT_LOG_FILE: &str = "./autoflow.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! flow_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! flow_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! flow_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! flow_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! flow_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to [`DEFAULT_LOG_FILE`] in the current directory.
    File,
    /// Write to the terminal.
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the global logger with the specified destination and level.
///
/// If the log file cannot be created, logging falls back to the terminal
/// with a warning on stderr.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let log_path = PathBuf::from(DEFAULT_LOG_FILE);
    let _ = CombinedLogger::init(build_loggers(destination, level, &log_path));
}

fn build_loggers(
    destination: LogDestination,
    level: LevelFilter,
    log_path: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = build_config();
    let file_logger = match destination {
        LogDestination::Terminal => None,
        LogDestination::File | LogDestination::Both => {
            create_file_logger(log_path, level, config.clone())
        }
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if destination != LogDestination::File || file_logger.is_none() {
        loggers.push(TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if let Some(file_logger) = file_logger {
        loggers.push(file_logger);
    }
    loggers
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    log_path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwritable_path() -> PathBuf {
        std::env::temp_dir()
            .join("autoflow_logging_missing_dir")
            .join("nested")
            .join("autoflow.log")
    }

    #[test]
    fn file_destination_falls_back_to_terminal() {
        let loggers = build_loggers(LogDestination::File, LevelFilter::Info, &unwritable_path());
        assert_eq!(loggers.len(), 1);
    }

    #[test]
    fn both_keeps_terminal_when_file_fails() {
        let loggers = build_loggers(LogDestination::Both, LevelFilter::Info, &unwritable_path());
        assert_eq!(loggers.len(), 1);
    }

    #[test]
    fn file_destination_writes_only_to_file_when_possible() {
        let path = std::env::temp_dir().join(format!("autoflow_log_{}.log", std::process::id()));
        let loggers = build_loggers(LogDestination::File, LevelFilter::Info, &path);
        assert_eq!(loggers.len(), 1);
        assert!(path.is_file());
        let _ = std::fs::remove_file(&path);
    }
}
