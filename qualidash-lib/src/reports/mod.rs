//! Quality report assembly and multi-format report generation
//!
//! A [`QualityReport`] groups the metrics of a project into [`Section`]s: one for
//! the project itself, one for its documents, one per product and one per team.
//! Each metric is numbered within its section (`CO-1`, `CO-2`, ...) and each
//! section gets a [`SectionColor`] summarizing the statuses of its metrics.
//!
//! # Implementation Model
//!
//! Rendering the texts of a metric can fail on a broken template, so the report is
//! first turned into [`ReportableSection`]s holding plain, fully rendered data. The
//! generators then operate on that uniform input:
//! - **Console**: Terminal output with ANSI colors and word wrapping
//! - **CSV**: One row per metric, for spreadsheets
//! - **JSON**: Machine-readable structured data
//!
//! Shared formatting of values, statuses and links lives in the `common` module.

mod common;
mod console;
mod csv;
mod json;
mod quality_report;
mod reportable;
mod section;

#[cfg(test)]
mod fixtures;

pub use console::{ConsoleOutputMode, generate as generate_console};
pub use csv::generate as generate_csv;
pub use json::generate as generate_json;
pub use quality_report::QualityReport;
pub use reportable::{ReportableMetric, ReportableSection};
pub use section::{Section, SectionColor};
