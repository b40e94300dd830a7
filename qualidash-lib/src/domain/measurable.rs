use super::{MetricKind, TechnicalDebtTarget};
use crate::metric_source::MetricSource;
use chrono::TimeDelta;
use std::collections::{BTreeSet, HashMap};

/// Per-metric settings a subject can override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricOptions {
    pub target: Option<f64>,
    pub low_target: Option<f64>,
    pub debt_target: Option<TechnicalDebtTarget>,
    pub comment: Option<String>,
    pub old_age: Option<TimeDelta>,
    pub max_old_age: Option<TimeDelta>,
}

static NO_OPTIONS: MetricOptions = MetricOptions {
    target: None,
    low_target: None,
    debt_target: None,
    comment: None,
    old_age: None,
    max_old_age: None,
};

/// The metric-specific overrides and metric source ids of a subject.
///
/// Source ids are keyed by the name of the metric source instance, so the same subject can be
/// known under different ids in different instances of the same kind of source.
#[derive(Debug, Clone, Default)]
pub struct MeasurableObject {
    metric_source_ids: HashMap<String, Vec<String>>,
    metric_options: HashMap<MetricKind, MetricOptions>,
}

impl MeasurableObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the id(s) of this object in the named metric source.
    #[must_use]
    pub fn with_metric_source_ids<I, S>(mut self, source_name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _ = self
            .metric_source_ids
            .insert(source_name.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    /// Register the options of this object for a metric kind.
    #[must_use]
    pub fn with_metric_options(mut self, kind: MetricKind, options: MetricOptions) -> Self {
        let _ = self.metric_options.insert(kind, options);
        self
    }

    #[must_use]
    pub fn metric_options(&self, kind: MetricKind) -> &MetricOptions {
        self.metric_options.get(&kind).unwrap_or(&NO_OPTIONS)
    }

    /// The id(s) of this object in the given metric source.
    ///
    /// A list without any non-empty id counts as no id at all.
    #[must_use]
    pub fn metric_source_id(&self, source: &MetricSource) -> Option<&[String]> {
        self.metric_source_ids
            .get(source.name())
            .map(Vec::as_slice)
            .filter(|ids| ids.iter().any(|id| !id.is_empty()))
    }

    /// The names of the metric sources this object has ids for.
    #[must_use]
    pub fn metric_source_names(&self) -> BTreeSet<&str> {
        self.metric_source_ids.keys().map(String::as_str).collect()
    }
}

/// Anything metrics can be measured for: a project, product, team or document.
///
/// Every lookup has a default that reports "nothing configured", so implementations only need to
/// provide what they actually carry.
pub trait MeasurableSubject: core::fmt::Debug {
    /// The name of the subject as shown in reports.
    fn name(&self) -> &str;

    /// Whether the subject stands for a group of subjects rather than a single one.
    fn is_collection(&self) -> bool {
        false
    }

    fn metric_options(&self, _kind: MetricKind) -> &MetricOptions {
        &NO_OPTIONS
    }

    fn metric_source_id(&self, _source: &MetricSource) -> Option<&[String]> {
        None
    }

    /// The id of the first candidate source this subject has an id for.
    fn metric_source_id_in<'a>(&'a self, candidates: &[&MetricSource]) -> Option<&'a [String]> {
        candidates.iter().find_map(|source| self.metric_source_id(source))
    }

    fn required_metric_kinds(&self) -> BTreeSet<MetricKind> {
        BTreeSet::new()
    }

    fn target(&self, kind: MetricKind) -> Option<f64> {
        self.metric_options(kind).target
    }

    fn low_target(&self, kind: MetricKind) -> Option<f64> {
        self.metric_options(kind).low_target
    }

    fn technical_debt_target(&self, kind: MetricKind) -> Option<&TechnicalDebtTarget> {
        self.metric_options(kind).debt_target.as_ref()
    }
}
