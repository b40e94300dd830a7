use super::{Section, SectionColor};
use crate::Result;
use crate::domain::{MetricKind, Status};
use crate::metrics::{MAX_SUBJECT_LENGTH, Metric};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A metric with all of its texts rendered, ready for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportableMetric {
    pub id: String,
    pub stable_id: String,
    pub kind: MetricKind,
    pub name: String,
    pub subject: String,
    pub status: Status,

    /// Since when the metric has its status, if the history knows.
    pub status_start_date: Option<DateTime<Utc>>,
    pub value: f64,
    pub unit: String,
    pub report: String,
    pub norm: String,
    pub comment: String,
    pub url_label: String,
    pub urls: BTreeMap<String, String>,
    pub recent_history: Vec<i64>,
    pub y_axis_range: (i64, i64),
}

impl ReportableMetric {
    /// Render a metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the report or norm template of the metric cannot be rendered.
    pub fn new(metric: &Metric<'_>) -> Result<Self> {
        let status_start_date = Some(metric.status_start_date()).filter(|date| *date != DateTime::<Utc>::MIN_UTC);

        Ok(Self {
            id: metric.id_string().to_string(),
            stable_id: metric.stable_id().to_string(),
            kind: metric.kind(),
            name: metric.name().to_string(),
            subject: metric.subject_name().to_string(),
            status: metric.status(),
            status_start_date,
            value: metric.numerical_value(),
            unit: metric.unit().to_string(),
            report: metric.report(MAX_SUBJECT_LENGTH)?,
            norm: metric.norm()?,
            comment: metric.comment().to_string(),
            url_label: metric.url_label().to_string(),
            urls: metric.url(),
            recent_history: metric.recent_history(),
            y_axis_range: metric.y_axis_range(),
        })
    }
}

/// A report section with its metrics rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportableSection {
    pub id_prefix: String,
    pub title: String,
    pub subtitle: String,
    pub color: SectionColor,
    pub metrics: Vec<ReportableMetric>,
}

impl ReportableSection {
    /// Render the metrics of a section.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric of the section cannot be rendered.
    pub fn new(section: &Section<'_>) -> Result<Self> {
        Ok(Self {
            id_prefix: section.id_prefix().to_string(),
            title: section.title().to_string(),
            subtitle: section.subtitle().to_string(),
            color: section.color(),
            metrics: section.metrics().iter().map(ReportableMetric::new).collect::<Result<_>>()?,
        })
    }
}
