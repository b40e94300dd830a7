use super::Host;
use super::common::load_project;
use super::config::DEFAULT_CONFIG_FILE;
use crate::Result;
use crate::reports::QualityReport;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the project definition
    #[arg(long, short = 'c', value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,
}

struct Summary {
    project: String,
    sections: usize,
    metrics: usize,
}

/// Validates a project definition by building the project and rendering every metric text of its report
///
/// # Errors
///
/// Returns an error if the definition cannot be loaded or a metric text cannot be rendered
fn validate_config_inner(config_path: &Utf8Path) -> Result<Summary> {
    let project = load_project(config_path)?;
    let report = QualityReport::new(&project, Utc::now());
    let sections = report.reportable_sections()?;

    Ok(Summary {
        project: format!("{}/{}", project.organization(), project.name()),
        sections: sections.len(),
        metrics: sections.iter().map(|section| section.metrics.len()).sum(),
    })
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    match validate_config_inner(&args.config) {
        Ok(summary) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            let _ = writeln!(host.output(), "Config file: {}", args.config);
            let _ = writeln!(
                host.output(),
                "Project {} reports {} metric(s) in {} section(s)",
                summary.project,
                summary.metrics,
                summary.sections
            );
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    fn validate(config: Utf8PathBuf) -> (Result<()>, TestHost) {
        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config });
        (result, host)
    }

    #[test]
    fn test_default_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = Utf8PathBuf::from_path_buf(dir.path().join("qualidash.toml")).unwrap();

        let mut init_host = TestHost::new();
        init_config(&mut init_host, &InitArgs { output: config.clone(), force: false }).unwrap();

        let (result, host) = validate(config);
        assert!(result.is_ok(), "Default configuration should validate successfully: {result:?}");
        assert!(host.output_text().contains("Configuration file is valid"));
        assert!(host.output_text().contains("Project Example Organization/Example Project reports"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (result, host) = validate(Utf8PathBuf::from_path_buf(dir.path().join("missing.toml")).unwrap());

        let _ = result.unwrap_err();
        assert!(host.error_text().contains("Configuration validation failed"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            "invalid_syntax.toml",
            r#"
organization = "Org"
# Missing closing bracket
[project
name = "Example"
"#,
        );

        let (result, host) = validate(config);
        assert!(result.unwrap_err().to_string().contains("parsing configuration file"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            "unknown_field.toml",
            r#"
organization = "Org"
unknown_field = "value"

[project]
name = "Example"
"#,
        );

        let (result, _) = validate(config);
        assert!(result.is_err(), "Unknown field should fail validation");
    }

    #[test]
    fn test_invalid_duration_format() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            "invalid_duration.toml",
            r#"
organization = "Org"

[project]
name = "Example"

[project.metrics.OpenBugs]
old_age = "not a valid duration"
"#,
        );

        let (result, _) = validate(config);
        assert!(result.is_err(), "Invalid duration format should fail validation");
    }

    #[test]
    fn test_duplicate_short_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            "duplicate.toml",
            r#"
organization = "Org"

[project]
name = "Example"

[[products]]
name = "One"
short_name = "AB"

[[teams]]
name = "Two"
short_name = "AB"
"#,
        );

        let (result, host) = validate(config);
        assert!(result.unwrap_err().to_string().contains("AB"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, "minimal.toml", "organization = \"Org\"\n\n[project]\nname = \"Example\"\n");

        let (result, host) = validate(config);
        assert!(result.is_ok(), "Minimal config should be valid: {result:?}");
        assert!(host.output_text().contains("reports 0 metric(s) in 0 section(s)"));
    }
}
