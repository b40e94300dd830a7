//! Command dispatch logic for qualidash

use super::common::{LogLevel, init_logging};
use super::{InitArgs, ReportArgs, ValidateArgs, generate_report, init_config, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "qualidash", author, version, long_about = None)]
#[command(about = "Evaluate software quality metrics against configurable norms")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the project's metrics and generate quality reports
    Report(Box<ReportArgs>),
    /// Validate a project definition
    Validate(ValidateArgs),
    /// Generate a default project definition
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        Command::Report(report_args) => generate_report(host, report_args),
        Command::Validate(validate_args) => validate_config(host, validate_args),
        Command::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::report::ConsoleSection;
    use camino::Utf8PathBuf;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_arguments() {
        let cli = Cli::parse_from([
            "qualidash",
            "report",
            "-c",
            "project.toml",
            "--json",
            "out.json",
            "--console",
            "norms,links",
            "--error-if-red",
        ]);

        let Command::Report(args) = cli.command else {
            unreachable!("expected the report command");
        };
        assert_eq!(args.config, Utf8PathBuf::from("project.toml"));
        assert_eq!(args.json, Some(Utf8PathBuf::from("out.json")));
        assert_eq!(args.console, Some(vec![ConsoleSection::Norms, ConsoleSection::Links]));
        assert!(args.error_if_red);
        assert_eq!(cli.log_level, LogLevel::None);
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["qualidash", "validate"]);
        let Command::Validate(args) = cli.command else {
            unreachable!("expected the validate command");
        };
        assert_eq!(args.config, Utf8PathBuf::from("qualidash.toml"));

        let cli = Cli::parse_from(["qualidash", "init"]);
        let Command::Init(args) = cli.command else {
            unreachable!("expected the init command");
        };
        assert_eq!(args.output, Utf8PathBuf::from("qualidash.toml"));
    }

    #[test]
    fn test_run_init_and_validate() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("qualidash.toml").to_string_lossy().into_owned();

        let mut host = TestHost::new();
        run(&mut host, ["qualidash", "init", config.as_str()]).unwrap();
        run(&mut host, ["qualidash", "validate", "--config", config.as_str()]).unwrap();

        assert!(host.output_text().contains("Configuration file is valid"));
    }
}
