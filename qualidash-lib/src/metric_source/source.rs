use super::{MetricSourceKind, Quantity};
use crate::Result;
use chrono::{DateTime, Utc};

const LOG_TARGET: &str = "    source";

/// The value a metric source reports when it could not measure a quantity.
pub const MISSING_VALUE: f64 = -1.0;

/// Retrieves raw measurements from an external tool.
///
/// Implementations are free to fail; [`MetricSource`] absorbs every failure and turns it into a
/// sentinel value before it reaches the metric engine.
pub trait MeasurementProvider: core::fmt::Debug {
    /// Fetch a quantity, either for the subject with the given id or for the whole source.
    fn fetch(&self, quantity: Quantity, id: Option<&str>) -> Result<f64>;

    /// Fetch the date of the most recent measurement, either for the subject with the given id or for the whole source.
    fn fetch_date(&self, id: Option<&str>) -> Result<DateTime<Utc>>;
}

/// A configured instance of a metric source.
#[derive(Debug)]
pub struct MetricSource {
    name: String,
    kind: MetricSourceKind,
    url: String,
    url_template: Option<String>,
    provider: Box<dyn MeasurementProvider>,
}

impl MetricSource {
    /// Create a metric source instance. The name identifies the instance within the project.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: MetricSourceKind,
        url: impl Into<String>,
        provider: impl MeasurementProvider + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.into(),
            url_template: None,
            provider: Box::new(provider),
        }
    }

    /// Set the template used to link to a subject in the source. `{id}` is replaced by the subject's id.
    #[must_use]
    pub fn with_url_template(mut self, url_template: impl Into<String>) -> Self {
        self.url_template = Some(url_template.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> MetricSourceKind {
        self.kind
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn metric_source_name(&self) -> &'static str {
        self.kind.metric_source_name()
    }

    #[must_use]
    pub const fn needs_metric_source_id(&self) -> bool {
        self.kind.needs_metric_source_id()
    }

    /// Measure a quantity, summed over all given ids.
    ///
    /// Returns [`MISSING_VALUE`] if any of the measurements fails.
    #[must_use]
    pub fn measure(&self, quantity: Quantity, ids: &[String]) -> f64 {
        if ids.is_empty() {
            return self.fetch(quantity, None);
        }

        let mut total = 0.0;
        for id in ids {
            let value = self.fetch(quantity, Some(id));
            if value < 0.0 {
                return MISSING_VALUE;
            }
            total += value;
        }

        total
    }

    /// The date of the oldest of the most recent measurements for the given ids.
    ///
    /// Returns the minimal date if any of the dates cannot be retrieved.
    #[must_use]
    pub fn datetime(&self, ids: &[String]) -> DateTime<Utc> {
        if ids.is_empty() {
            return self.fetch_date(None);
        }

        ids.iter()
            .map(|id| self.fetch_date(Some(id)))
            .min()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Links to the given subjects in this source.
    #[must_use]
    pub fn metric_source_urls(&self, ids: &[&str]) -> Vec<String> {
        match &self.url_template {
            Some(template) => ids.iter().map(|id| template.replace("{id}", id)).collect(),
            None => vec![self.url.clone()],
        }
    }

    fn fetch(&self, quantity: Quantity, id: Option<&str>) -> f64 {
        match self.provider.fetch(quantity, id) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    target: LOG_TARGET,
                    "Could not retrieve {quantity} for {} from {}: {e:#}",
                    id.unwrap_or("<all>"),
                    self.name
                );
                MISSING_VALUE
            }
        }
    }

    fn fetch_date(&self, id: Option<&str>) -> DateTime<Utc> {
        match self.provider.fetch_date(id) {
            Ok(date) => date,
            Err(e) => {
                log::warn!(
                    target: LOG_TARGET,
                    "Could not retrieve measurement date for {} from {}: {e:#}",
                    id.unwrap_or("<all>"),
                    self.name
                );
                DateTime::<Utc>::MIN_UTC
            }
        }
    }
}
