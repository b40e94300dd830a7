//! Options and helpers shared by the commands.

use super::config::Config;
use crate::Result;
use crate::domain::Project;
use camino::Utf8Path;
use clap::ValueEnum;
use std::io::IsTerminal;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    /// Decide whether to emit ANSI colors on standard output.
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

impl LogLevel {
    const fn filter(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Error => Some("error"),
            Self::Warn => Some("warn"),
            Self::Info => Some("info"),
            Self::Debug => Some("debug"),
            Self::Trace => Some("trace"),
        }
    }
}

/// Initialize the logger for the given level. `RUST_LOG` takes precedence when set.
pub fn init_logging(log_level: LogLevel) {
    let Some(level) = log_level.filter() else {
        return;
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger installed earlier in the process (e.g. by a previous command in the same test) stays in place
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Load a project definition and build the project it describes.
///
/// # Errors
///
/// Returns an error if the definition cannot be loaded or describes an inconsistent project
pub fn load_project(config_path: &Utf8Path) -> Result<Project> {
    let config = Config::load(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Utf8Path::new("."));
    config.into_project(base_dir)
}
