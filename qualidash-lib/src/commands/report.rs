use super::common::{ColorMode, load_project};
use super::config::DEFAULT_CONFIG_FILE;
use super::Host;
use crate::Result;
use crate::reports::{ConsoleOutputMode, QualityReport, generate_console, generate_csv, generate_json};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

/// Details that can be shown below each metric in console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConsoleSection {
    /// Show the norm the metric is held to
    Norms,

    /// Show the comments configured for the metric
    Comments,

    /// Show links to the metric sources
    Links,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the project definition
    #[arg(long, short = 'c', value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Output the report to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output the report to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output the report to the console, showing the specified details below each metric.
    /// Defaults to showing all details. If omitted entirely, console output is shown only when no other reports are generated.
    #[arg(long, value_name = "DETAILS", value_delimiter = ',', default_missing_value = "norms,comments,links", num_args = 0..=1, help_heading = "Report Output")]
    pub console: Option<Vec<ConsoleSection>>,

    /// Exit with status code 1 if any metric needs immediate action
    #[arg(long)]
    pub error_if_red: bool,
}

pub fn generate_report<H: Host>(host: &mut H, args: &ReportArgs) -> Result<()> {
    let project = load_project(&args.config)?;
    let report = QualityReport::new(&project, Utc::now());
    let title = report.title();
    let sections = report.reportable_sections()?;

    let generating_reports = args.csv.is_some() || args.json.is_some();

    // Show console output if:
    // - --console flag is explicitly set, OR
    // - No reports are being generated AND --error-if-red is not set
    let console_mode = match &args.console {
        Some(details) => Some(ConsoleOutputMode {
            norms: details.contains(&ConsoleSection::Norms),
            comments: details.contains(&ConsoleSection::Comments),
            links: details.contains(&ConsoleSection::Links),
        }),
        None if !generating_reports && !args.error_if_red => Some(ConsoleOutputMode::full()),
        None => None,
    };

    if let Some(mode) = console_mode {
        let mut console_output = String::new();
        generate_console(&title, &sections, args.color.use_colors(), &mode, &mut console_output)?;
        let _ = write!(host.output(), "{console_output}");
    }

    if let Some(filename) = &args.csv {
        let mut csv_output = String::new();
        generate_csv(&sections, &mut csv_output)?;
        fs::write(filename, csv_output).into_app_err_with(|| format!("writing CSV report to '{filename}'"))?;
    }

    if let Some(filename) = &args.json {
        let mut json_output = String::new();
        generate_json(&title, report.date(), &sections, &mut json_output)?;
        fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
    }

    if args.error_if_red && report.direct_action_needed() {
        return Err(ohno::AppError::new("one or more metrics need immediate action"));
    }

    Ok(())
}
