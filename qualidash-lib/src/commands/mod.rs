//! Command-line interface and orchestration for qualidash
//!
//! This module implements the CLI commands and ties the other modules together:
//! it loads a project definition, builds the domain model from it, evaluates the
//! metrics and writes the resulting quality report.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **report**: Evaluate every required metric of the project and generate console,
//!   CSV and/or JSON output. With `--error-if-red`, fail when a metric needs immediate action
//! - **validate**: Load a project definition and render the full report in memory, so that
//!   every configuration and template error surfaces without producing output files
//! - **init**: Write the default project definition
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap, initializes logging,
//! and routes to the appropriate command handler. The report command:
//!
//! 1. Loads and validates the TOML project definition (`config`)
//! 2. Builds the [`Project`](crate::domain::Project) with its metric sources and history
//! 3. Assembles a [`QualityReport`](crate::reports::QualityReport) at the current time
//! 4. Renders it into report sections and hands them to the generators
//!
//! All terminal I/O goes through the [`Host`] trait so that commands can be
//! exercised from tests.

mod common;
mod config;
mod host;
mod init;
mod report;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use report::{ReportArgs, generate_report};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
