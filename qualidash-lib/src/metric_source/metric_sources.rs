use super::{MetricSource, MetricSourceKind};
use crate::Result;
use ohno::app_err;
use std::collections::{BTreeMap, BTreeSet};

/// The metric source instances configured for a project, grouped by kind in configuration order.
#[derive(Debug, Default)]
pub struct MetricSources {
    by_kind: BTreeMap<MetricSourceKind, Vec<MetricSource>>,
}

impl MetricSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric source instance.
    ///
    /// # Errors
    ///
    /// Returns an error if an instance with the same name is already registered.
    pub fn add(&mut self, source: MetricSource) -> Result<()> {
        if self.iter().any(|existing| existing.name() == source.name()) {
            return Err(app_err!("metric source '{}' is defined more than once", source.name()));
        }

        self.by_kind.entry(source.kind()).or_default().push(source);
        Ok(())
    }

    /// The instances of a kind of source, empty if the kind is not configured.
    #[must_use]
    pub fn get(&self, kind: MetricSourceKind) -> &[MetricSource] {
        self.by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn kinds(&self) -> BTreeSet<MetricSourceKind> {
        self.by_kind.keys().copied().collect()
    }

    /// Look up an instance by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&MetricSource> {
        self.iter().find(|source| source.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSource> {
        self.by_kind.values().flatten()
    }
}
