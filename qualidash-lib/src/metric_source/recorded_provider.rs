use super::{MeasurementProvider, Quantity};
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::app_err;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Recording {
    values: HashMap<Quantity, f64>,
    date: Option<DateTime<Utc>>,
}

/// A measurement provider that answers from measurements recorded up front.
///
/// Measurements can be recorded for the source as a whole, which answers requests without an id,
/// and per subject id. Anything that was not recorded is reported as an error.
#[derive(Debug, Clone, Default)]
pub struct RecordedProvider {
    overall: Recording,
    by_id: HashMap<String, Recording>,
}

impl RecordedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quantity for the source as a whole.
    #[must_use]
    pub fn with_value(mut self, quantity: Quantity, value: f64) -> Self {
        let _ = self.overall.values.insert(quantity, value);
        self
    }

    /// Record the measurement date for the source as a whole.
    #[must_use]
    pub const fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.overall.date = Some(date);
        self
    }

    /// Record a quantity for the subject with the given id.
    #[must_use]
    pub fn with_id_value(mut self, id: impl Into<String>, quantity: Quantity, value: f64) -> Self {
        let _ = self.by_id.entry(id.into()).or_default().values.insert(quantity, value);
        self
    }

    /// Record the measurement date for the subject with the given id.
    #[must_use]
    pub fn with_id_date(mut self, id: impl Into<String>, date: DateTime<Utc>) -> Self {
        self.by_id.entry(id.into()).or_default().date = Some(date);
        self
    }

    fn recording(&self, id: Option<&str>) -> Result<&Recording> {
        match id {
            None => Ok(&self.overall),
            Some(id) => self
                .by_id
                .get(id)
                .ok_or_else(|| app_err!("nothing recorded for '{id}'")),
        }
    }
}

impl MeasurementProvider for RecordedProvider {
    fn fetch(&self, quantity: Quantity, id: Option<&str>) -> Result<f64> {
        self.recording(id)?
            .values
            .get(&quantity)
            .copied()
            .ok_or_else(|| app_err!("no {quantity} recorded for '{}'", id.unwrap_or("<all>")))
    }

    fn fetch_date(&self, id: Option<&str>) -> Result<DateTime<Utc>> {
        self.recording(id)?
            .date
            .ok_or_else(|| app_err!("no measurement date recorded for '{}'", id.unwrap_or("<all>")))
    }
}
