use std::{
    fmt::Display,
    fs::File,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
};

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Path of the log file for a run started now, inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!(
        "determinize_run_{}.txt",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ))
}

/// Installs a global `tracing` subscriber writing to stderr, and additionally
/// to a log file in `./logs` if configured. Does nothing when logging is
/// disabled.
pub fn init_tracing(config: &LoggerConfig) -> anyhow::Result<()> {
    init_tracing_in(config, Path::new("./logs"))
}

pub fn init_tracing_in(config: &LoggerConfig, log_dir: &Path) -> anyhow::Result<()> {
    if !*config.get_enabled() {
        return Ok(());
    }

    let builder = tracing_subscriber::fmt()
        .with_max_level(config.get_log_level().to_tracing_level())
        .with_target(false);

    if !*config.get_log_file() {
        // an already installed subscriber wins
        let _ = builder.with_writer(std::io::stderr).try_init();
        return Ok(());
    }

    let path = log_file_path(log_dir);
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let installed = builder
        .with_ansi(false)
        .with_writer(std::io::stderr.and(Mutex::new(file)))
        .try_init();

    if let Err(err) = installed {
        tracing::warn!(
            "Not logging to {}, a tracing subscriber is already installed: {}",
            path.display(),
            err
        );
        let _ = std::fs::remove_file(&path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DBG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Info.to_string(), "Info");
        assert_eq!(LogLevel::Error.to_tracing_level(), Level::ERROR);
    }

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let log_dir = std::env::temp_dir().join("nfa_det_disabled_logs");
        let config = LoggerConfig::default().with_log_file(true);

        assert!(init_tracing_in(&config, &log_dir).is_ok());
        assert!(!log_dir.exists());
    }

    #[test]
    fn test_enabled_logging() {
        let log_dir = std::env::temp_dir().join(format!("nfa_det_logs_{}", std::process::id()));
        let config = LoggerConfig::default()
            .with_enabled(true)
            .with_log_level(LogLevel::Debug);

        // installs the global subscriber of this test binary
        assert!(init_tracing_in(&config, &log_dir).is_ok());
        assert!(!log_dir.exists());

        // the global subscriber is taken now, so no log file is kept
        let with_file = config.with_log_file(true);
        assert!(init_tracing_in(&with_file, &log_dir).is_ok());
        assert!(log_dir.exists());
        assert_eq!(std::fs::read_dir(&log_dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir(&log_dir);
    }
}
