//! Common utilities shared across report generators.

use super::ReportableMetric;
use crate::domain::{Status, format_date};
use crate::metric_source::MISSING_VALUE;
use std::collections::BTreeMap;

/// Format a metric value with its unit, `n/a` when the value could not be measured.
#[expect(clippy::float_cmp, reason = "the sentinel is assigned, never computed")]
pub fn format_value(value: f64, unit: &str) -> String {
    if value == MISSING_VALUE {
        "n/a".to_string()
    } else if unit == "%" {
        format!("{value}%")
    } else {
        format!("{value} {unit}")
    }
}

/// Format a status as a consistent label.
pub const fn format_status(status: Status) -> &'static str {
    match status {
        Status::MissingSource => "MISSING SOURCE",
        Status::Missing => "MISSING",
        Status::Grey => "GREY",
        Status::Red => "RED",
        Status::Yellow => "YELLOW",
        Status::Perfect => "PERFECT",
        Status::Green => "GREEN",
    }
}

/// Format the date a metric got its status, empty when unknown.
pub fn format_status_start_date(metric: &ReportableMetric) -> String {
    metric
        .status_start_date
        .map_or_else(String::new, |date| format_date(Some(date), true))
}

/// Format links as `label: url` pairs separated by semicolons.
pub fn format_urls(urls: &BTreeMap<String, String>) -> String {
    urls.iter()
        .map(|(label, url)| format!("{label}: {url}"))
        .collect::<Vec<_>>()
        .join("; ")
}
