use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, path::Path, str::FromStr};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub fn default_logs_datetime_format() -> String {
    String::from("%Y-%m-%d %H:%M:%S%.3f")
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("invalid module configuration '{}', expected module=level", _0)]
    InvalidModuleConfig(String),
    #[error("Error while preparing the log file: {}", _0)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

// Level override for a single module, written `module=level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub module: String,
    pub level: LogLevel,
}

impl FromStr for ModuleConfig {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, level) = s
            .split_once('=')
            .ok_or_else(|| LoggerError::InvalidModuleConfig(s.to_owned()))?;
        let module = module.trim();
        if module.is_empty() {
            return Err(LoggerError::InvalidModuleConfig(s.to_owned()));
        }
        let level = LogLevel::from_str(level.trim())
            .map_err(|_| LoggerError::InvalidModuleConfig(s.to_owned()))?;

        Ok(Self {
            module: module.to_owned(),
            level,
        })
    }
}

impl Display for ModuleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.module, self.level)
    }
}

pub struct LoggerOptions<'a> {
    pub level: LogLevel,
    // Same as `level` when not set
    pub file_level: Option<LogLevel>,
    pub disable_file_logging: bool,
    pub disable_file_log_date_based: bool,
    pub disable_colors: bool,
    pub filename: &'a str,
    pub logs_path: &'a str,
    pub modules: &'a [ModuleConfig],
    pub datetime_format: &'a str,
}

// Install the global logger: terminal output, plus a log file rotated every day
// unless disabled. Panics are routed to the logger too.
pub fn setup_logger(options: LoggerOptions<'_>) -> Result<(), LoggerError> {
    let level = LevelFilter::from(options.level);
    let file_level = options.file_level.map(LevelFilter::from).unwrap_or(level);

    let mut base = fern::Dispatch::new().level(if options.disable_file_logging {
        level
    } else {
        level.max(file_level)
    });
    for config in options.modules {
        base = base.level_for(config.module.clone(), config.level.into());
    }

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::Magenta);
    let disable_colors = options.disable_colors;
    let datetime_format = options.datetime_format.to_owned();
    let stdout = fern::Dispatch::new()
        .level(level)
        .format(move |out, message, record| {
            let time = chrono::Local::now().format(&datetime_format);
            if disable_colors {
                out.finish(format_args!(
                    "[{}] [{}] [{}] {}",
                    time,
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "\x1B[90m[{}]\x1B[0m [{}] [{}] {}",
                    time,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            }
        })
        .chain(std::io::stdout());
    base = base.chain(stdout);

    if !options.disable_file_logging {
        let logs_path = Path::new(options.logs_path);
        std::fs::create_dir_all(logs_path)?;

        let datetime_format = options.datetime_format.to_owned();
        let file = fern::Dispatch::new()
            .level(file_level)
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{}] [{}] [{}] {}",
                    chrono::Local::now().format(&datetime_format),
                    record.level(),
                    record.target(),
                    message
                ))
            });

        let file = if options.disable_file_log_date_based {
            file.chain(fern::log_file(logs_path.join(options.filename))?)
        } else {
            // File prefix and dated suffix are concatenated as is
            let prefix = format!("{}/", options.logs_path.trim_end_matches('/'));
            file.chain(fern::DateBased::new(
                prefix,
                format!("%Y-%m-%d.{}", options.filename),
            ))
        };
        base = base.chain(file);
    }

    base.apply()?;
    log_panics::init();

    Ok(())
}
