use crate::domain::{Status, Subject};
use crate::metrics::Metric;
use serde::Serialize;
use std::collections::HashSet;
use strum::{Display, IntoStaticStr};

/// The color of a report section, summarizing the statuses of its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SectionColor {
    Red,
    Yellow,
    Grey,
    Green,

    /// The section has no metrics.
    White,
}

/// Statuses in the order in which they determine the color of a section.
const ORDERED_STATUSES: [Status; 7] = [
    Status::Missing,
    Status::MissingSource,
    Status::Red,
    Status::Yellow,
    Status::Grey,
    Status::Green,
    Status::Perfect,
];

/// A titled group of metrics within a quality report.
#[derive(Debug)]
pub struct Section<'a> {
    id_prefix: String,
    title: String,
    subtitle: String,
    product: Option<&'a Subject>,
    metrics: Vec<Metric<'a>>,
}

impl<'a> Section<'a> {
    /// Create a section, numbering its metrics `<id_prefix>-1`, `<id_prefix>-2` and so on.
    #[must_use]
    pub fn new(
        id_prefix: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        mut metrics: Vec<Metric<'a>>,
    ) -> Self {
        let id_prefix = id_prefix.into();
        for (index, metric) in metrics.iter_mut().enumerate() {
            metric.set_id_string(format!("{id_prefix}-{}", index + 1));
        }

        Self {
            id_prefix,
            title: title.into(),
            subtitle: subtitle.into(),
            product: None,
            metrics,
        }
    }

    /// Mark the section as being about a product.
    #[must_use]
    pub const fn with_product(mut self, product: &'a Subject) -> Self {
        self.product = Some(product);
        self
    }

    #[must_use]
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub const fn product(&self) -> Option<&'a Subject> {
        self.product
    }

    #[must_use]
    pub fn metrics(&self) -> &[Metric<'a>] {
        &self.metrics
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// The color of the section: the most severe status among its metrics.
    ///
    /// Missing metrics count as red and perfect metrics as green.
    #[must_use]
    pub fn color(&self) -> SectionColor {
        let statuses: HashSet<Status> = self.metrics.iter().map(Metric::status).collect();

        match ORDERED_STATUSES.into_iter().find(|status| statuses.contains(status)) {
            Some(Status::Missing | Status::MissingSource | Status::Red) => SectionColor::Red,
            Some(Status::Yellow) => SectionColor::Yellow,
            Some(Status::Grey) => SectionColor::Grey,
            Some(Status::Green | Status::Perfect) => SectionColor::Green,
            None => SectionColor::White,
        }
    }
}
