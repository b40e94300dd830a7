use super::metric_def::{Measure, Measurement, MetricDef};
use super::percentage::percentage;
use super::template::{Parameters, render};
use crate::Result;
use crate::domain::{MeasurableSubject, MetricKind, Project, Status, format_age, format_date};
use crate::metric_source::{MISSING_VALUE, MetricSource, MetricSourceKind};
use chrono::{DateTime, TimeDelta, Utc};
use core::cell::OnceCell;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "    metric";

/// Default maximum length of subject names in report texts.
pub const MAX_SUBJECT_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy)]
struct Measured {
    value: f64,

    /// Numerator and denominator of percentage metrics.
    fraction: Option<(f64, f64)>,
}

/// A metric definition bound to a subject of a project, evaluated at a fixed instant.
///
/// The measured value, the measurement date and the comment are computed on first use
/// and reused for the lifetime of the metric.
#[derive(Debug)]
pub struct Metric<'a> {
    def: &'a MetricDef,
    subject: &'a dyn MeasurableSubject,
    project: &'a Project,
    now: DateTime<Utc>,
    metric_source: Option<&'a MetricSource>,
    metric_source_ids: Vec<String>,
    stable_id: String,
    id_string: String,
    measured: OnceCell<Measured>,
    date: OnceCell<Option<DateTime<Utc>>>,
    comment: OnceCell<String>,
}

impl<'a> Metric<'a> {
    #[must_use]
    pub fn new(def: &'a MetricDef, subject: &'a dyn MeasurableSubject, project: &'a Project, now: DateTime<Utc>) -> Self {
        let stable_id = if subject.is_collection() {
            def.kind.to_string()
        } else {
            format!("{}{}", def.kind, subject.name())
        };

        let (metric_source, metric_source_ids) = def
            .primary_metric_source_kind()
            .map_or((None, Vec::new()), |kind| resolve_metric_source(kind, subject, project, &stable_id));

        Self {
            def,
            subject,
            project,
            now,
            metric_source,
            metric_source_ids,
            id_string: stable_id.clone(),
            stable_id,
            measured: OnceCell::new(),
            date: OnceCell::new(),
            comment: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn def(&self) -> &MetricDef {
        self.def
    }

    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.def.kind
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.def.name
    }

    #[must_use]
    pub const fn unit(&self) -> &'static str {
        self.def.unit
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        self.subject.name()
    }

    /// The metric source that is measured, if one could be resolved.
    #[must_use]
    pub const fn metric_source(&self) -> Option<&'a MetricSource> {
        self.metric_source
    }

    /// The ids of the subject in the resolved metric source.
    #[must_use]
    pub fn metric_source_ids(&self) -> &[String] {
        &self.metric_source_ids
    }

    /// An id that does not depend on where the metric is shown in a report.
    #[must_use]
    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    /// Set the id as shown in a report, such as `PC-3`.
    pub fn set_id_string(&mut self, id_string: impl Into<String>) {
        self.id_string = id_string.into();
    }

    /// The id as shown in a report; the stable id until [`Self::set_id_string`] is called.
    #[must_use]
    pub fn id_string(&self) -> &str {
        &self.id_string
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.subject.target(self.def.kind).unwrap_or(self.def.target_value)
    }

    #[must_use]
    pub fn low_target(&self) -> f64 {
        self.subject.low_target(self.def.kind).unwrap_or(self.def.low_target_value)
    }

    /// The measured value, -1 if it could not be measured.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.measured().value
    }

    /// The value for use in graphs.
    #[must_use]
    pub fn numerical_value(&self) -> f64 {
        self.value()
    }

    /// When the subject was last measured, if the metric tracks measurement dates.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        *self.date.get_or_init(|| {
            self.metric_source
                .and_then(|source| (self.def.date)(&Measurement::new(source, &self.metric_source_ids, self.now)))
        })
    }

    /// Time since the last measurement; the maximal duration when the date is not tracked.
    #[must_use]
    pub fn age(&self) -> TimeDelta {
        self.date().map_or(TimeDelta::MAX, |date| self.now - date)
    }

    #[must_use]
    pub fn old_age(&self) -> TimeDelta {
        self.subject.metric_options(self.def.kind).old_age.unwrap_or(self.def.old_age)
    }

    #[must_use]
    pub fn max_old_age(&self) -> TimeDelta {
        self.subject.metric_options(self.def.kind).max_old_age.unwrap_or(self.def.max_old_age)
    }

    /// The status of the metric.
    ///
    /// Checks are made in order of precedence and the first that holds determines the status:
    /// missing source configuration, missing value, accepted technical debt, immediate action
    /// needed, below target, perfect. A metric passing all checks is green.
    #[must_use]
    pub fn status(&self) -> Status {
        if self.missing_source_configuration() {
            Status::MissingSource
        } else if self.is_missing() {
            Status::Missing
        } else if self.has_accepted_technical_debt() {
            Status::Grey
        } else if self.needs_immediate_action() {
            Status::Red
        } else if self.is_below_target() {
            Status::Yellow
        } else if self.is_perfect() {
            Status::Perfect
        } else {
            Status::Green
        }
    }

    /// Since when the metric has its current status, according to the measurement history.
    #[must_use]
    pub fn status_start_date(&self) -> DateTime<Utc> {
        self.project
            .history()
            .status_start_date(&self.stable_id, self.status(), self.now)
    }

    /// The kinds of metric source the metric needs that the project does not configure.
    #[must_use]
    pub fn missing_source_kinds(&self) -> Vec<MetricSourceKind> {
        self.def
            .metric_source_kinds
            .iter()
            .copied()
            .filter(|&kind| self.project.metric_sources(kind).is_empty())
            .collect()
    }

    /// The kinds of metric source in which the subject needs an id but has none.
    #[must_use]
    pub fn missing_source_id_kinds(&self) -> Vec<MetricSourceKind> {
        self.def
            .metric_source_kinds
            .iter()
            .copied()
            .filter(|&kind| {
                let candidates: Vec<&MetricSource> = self.project.metric_sources(kind).iter().collect();
                kind.needs_metric_source_id() && self.subject.metric_source_id_in(&candidates).is_none()
            })
            .collect()
    }

    /// Describe the measured value in one sentence.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected template refers to an unknown parameter.
    pub fn report(&self, max_subject_length: usize) -> Result<String> {
        log::info!(target: LOG_TARGET, "Reporting {} on {}", self.def.kind, self.subject.name());
        self.render(self.template(), max_subject_length)
    }

    /// Describe the norm the metric is held to, with the targets that apply to the subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the norm template refers to an unknown parameter.
    pub fn norm(&self) -> Result<String> {
        self.render(self.def.norm_template, MAX_SUBJECT_LENGTH)
    }

    /// The explanation of the accepted technical debt followed by the subject's comment on the metric.
    #[must_use]
    pub fn comment(&self) -> &str {
        self.comment.get_or_init(|| {
            let debt = self
                .subject
                .technical_debt_target(self.def.kind)
                .map(|target| target.explanation_at(self.def.unit, self.now));
            let remark = self.subject.metric_options(self.def.kind).comment.clone();

            [debt, remark]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// Links to the measured subject in the metric source, keyed by label.
    ///
    /// Multiple links are told apart by appending `(i/n)` to the label.
    #[must_use]
    pub fn url(&self) -> BTreeMap<String, String> {
        let label = self.metric_source.map_or("Unknown metric source", MetricSource::metric_source_name);
        let urls: Vec<String> = self.metric_source_urls().into_iter().filter(|url| !url.is_empty()).collect();

        if urls.len() == 1 {
            return urls.into_iter().map(|url| (label.to_string(), url)).collect();
        }

        let count = urls.len();
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| (format!("{label} ({}/{count})", index + 1), url))
            .collect()
    }

    #[must_use]
    pub const fn url_label(&self) -> &'static str {
        self.def.url_label
    }

    /// The most recent values of the metric, rounded.
    #[must_use]
    pub fn recent_history(&self) -> Vec<i64> {
        self.project
            .history()
            .recent_history(&self.stable_id, &self.id_string)
            .into_iter()
            .map(round_to_integer)
            .collect()
    }

    /// The range of the y-axis for a graph of the recent history.
    #[must_use]
    pub fn y_axis_range(&self) -> (i64, i64) {
        if self.def.is_percentage() {
            return (0, 100);
        }

        let history = self.recent_history();
        match (history.iter().min(), history.iter().max()) {
            (Some(&minimum), Some(&maximum)) if minimum == maximum => (minimum - 1, maximum + 1),
            (Some(&minimum), Some(&maximum)) => (minimum, maximum),
            _ => (0, 100),
        }
    }

    fn measured(&self) -> Measured {
        *self.measured.get_or_init(|| {
            let Some(source) = self.metric_source else {
                return Measured {
                    value: MISSING_VALUE,
                    fraction: None,
                };
            };

            let measurement = Measurement::new(source, &self.metric_source_ids, self.now);
            match self.def.measure {
                Measure::Value(measure) => Measured {
                    value: measure(&measurement),
                    fraction: None,
                },
                Measure::Percentage { numerator, denominator } => {
                    let numerator = numerator(&measurement);
                    let denominator = denominator(&measurement);
                    if numerator < 0.0 || denominator < 0.0 {
                        return Measured {
                            value: MISSING_VALUE,
                            fraction: None,
                        };
                    }

                    #[expect(clippy::cast_precision_loss, reason = "percentages are small integers")]
                    let value = percentage(numerator, denominator, self.def.zero_divided_by_zero_is_zero()) as f64;
                    Measured {
                        value,
                        fraction: Some((numerator, denominator)),
                    }
                }
            }
        })
    }

    fn missing_source_configuration(&self) -> bool {
        !self.missing_source_kinds().is_empty() || !self.missing_source_id_kinds().is_empty()
    }

    #[expect(clippy::float_cmp, reason = "the sentinel is assigned, never computed")]
    fn is_missing(&self) -> bool {
        self.value() == MISSING_VALUE
    }

    fn is_value_better_than(&self, target: f64) -> bool {
        self.def
            .direction
            .is_better_than(self.value(), target, self.def.perfect_value().unwrap_or(0.0))
    }

    fn is_old(&self) -> bool {
        self.age() > self.old_age()
    }

    fn is_too_old(&self) -> bool {
        self.age() > self.max_old_age()
    }

    fn is_below_target(&self) -> bool {
        !self.is_value_better_than(self.target()) || self.is_old()
    }

    fn needs_immediate_action(&self) -> bool {
        !self.is_value_better_than(self.low_target()) || self.is_too_old()
    }

    fn has_accepted_technical_debt(&self) -> bool {
        self.subject
            .technical_debt_target(self.def.kind)
            .is_some_and(|debt| self.is_below_target() && self.is_value_better_than(debt.target_value_at(self.now)))
    }

    #[expect(clippy::float_cmp, reason = "perfect values are whole numbers")]
    fn is_perfect(&self) -> bool {
        let Some(perfect_value) = self.def.perfect_value() else {
            return false;
        };

        self.value() == perfect_value && !self.is_old()
    }

    fn template(&self) -> &'static str {
        if !self.missing_source_kinds().is_empty() {
            self.def.missing_source_template
        } else if !self.missing_source_id_kinds().is_empty() {
            self.def.missing_source_id_template
        } else if self.is_missing() {
            self.def.missing_template
        } else if self.is_perfect() && !self.def.perfect_template.is_empty() {
            self.def.perfect_template
        } else {
            self.def.template
        }
    }

    fn metric_source_urls(&self) -> Vec<String> {
        match self.metric_source {
            Some(source) if source.needs_metric_source_id() => {
                let ids: Vec<&str> = self
                    .metric_source_ids
                    .iter()
                    .map(String::as_str)
                    .filter(|id| !id.is_empty())
                    .collect();
                if ids.is_empty() {
                    Vec::new()
                } else {
                    source.metric_source_urls(&ids)
                }
            }
            Some(source) => vec![source.url().to_string()],
            None => Vec::new(),
        }
    }

    fn parameters(&self, max_subject_length: usize) -> Parameters {
        let mut parameters = Parameters::new();
        let _ = parameters.insert("name", truncate(self.subject.name(), max_subject_length));
        let _ = parameters.insert("metric", self.def.lowercase_name());
        let _ = parameters.insert("unit", self.def.unit.to_string());
        let _ = parameters.insert("target", self.target().to_string());
        let _ = parameters.insert("low_target", self.low_target().to_string());
        let _ = parameters.insert("value", self.value().to_string());
        let _ = parameters.insert("date", format_date(self.date(), false));
        let _ = parameters.insert("age", format_age(self.age()));
        let _ = parameters.insert("old_age", format_age(self.old_age()));
        let _ = parameters.insert("max_old_age", format_age(self.max_old_age()));
        let _ = parameters.insert("missing_source_classes", source_names(&self.missing_source_kinds()));
        let _ = parameters.insert("missing_source_id_classes", source_names(&self.missing_source_id_kinds()));
        if let Some((numerator, denominator)) = self.measured().fraction {
            let _ = parameters.insert("numerator", numerator.to_string());
            let _ = parameters.insert("denominator", denominator.to_string());
        }
        parameters
    }

    fn render(&self, template: &str, max_subject_length: usize) -> Result<String> {
        render(template, &self.parameters(max_subject_length)).inspect_err(|e| {
            log::error!(target: LOG_TARGET, "Could not fill in the template of {}: {e:#}", self.stable_id);
        })
    }
}

/// Pick the instance of a kind of metric source to measure, together with the subject's ids in it.
fn resolve_metric_source<'a>(
    kind: MetricSourceKind,
    subject: &dyn MeasurableSubject,
    project: &'a Project,
    stable_id: &str,
) -> (Option<&'a MetricSource>, Vec<String>) {
    let ids = |source: &MetricSource| subject.metric_source_id(source).map(<[String]>::to_vec);

    match project.metric_sources(kind) {
        [] => (None, Vec::new()),
        [source] => (Some(source), ids(source).unwrap_or_default()),
        candidates => candidates
            .iter()
            .find_map(|source| ids(source).map(|ids| (Some(source), ids)))
            .unwrap_or_else(|| {
                log::warn!(target: LOG_TARGET, "Could not find a {kind} metric source for {stable_id}");
                (None, Vec::new())
            }),
    }
}

fn truncate(name: &str, max_length: usize) -> String {
    if name.chars().count() > max_length {
        format!("{}...", name.chars().take(max_length).collect::<String>())
    } else {
        name.to_string()
    }
}

fn source_names(kinds: &[MetricSourceKind]) -> String {
    let mut names: Vec<&str> = kinds.iter().map(|kind| kind.metric_source_name()).collect();
    names.sort_unstable();
    names.join(", ")
}

#[expect(clippy::cast_possible_truncation, reason = "historic values are measured quantities")]
fn round_to_integer(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MeasurableObject, MetricOptions, Subject, SubjectKind, TechnicalDebtTarget};
    use crate::metric_source::{FileHistory, MetricSources, Quantity, RecordedProvider};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn def(kind: MetricKind) -> &'static MetricDef {
        MetricDef::for_kind(kind).unwrap()
    }

    fn project(sources: Vec<MetricSource>) -> Project {
        let mut metric_sources = MetricSources::new();
        for source in sources {
            metric_sources.add(source).unwrap();
        }
        Project::new(
            "Organization",
            Subject::new(SubjectKind::Project, "Example", "PC").unwrap(),
            metric_sources,
        )
    }

    fn sonar(name: &str, provider: RecordedProvider) -> MetricSource {
        MetricSource::new(name, MetricSourceKind::Sonar, "https://sonar.example.org/", provider)
            .with_url_template("https://sonar.example.org/dashboard?id={id}")
    }

    fn jira(provider: RecordedProvider) -> MetricSource {
        MetricSource::new("jira", MetricSourceKind::Jira, "https://jira.example.org/", provider)
    }

    fn component(measurable: MeasurableObject) -> Subject {
        Subject::new(SubjectKind::Component, "Core", "CO")
            .unwrap()
            .with_measurable(measurable)
    }

    fn open_bugs_options(options: MetricOptions) -> Subject {
        component(MeasurableObject::new().with_metric_options(MetricKind::OpenBugs, options))
    }

    #[test]
    fn test_missing_sonar_is_missing_source() {
        let project = project(vec![]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());

        assert_eq!(metric.status(), Status::MissingSource);
        assert_eq!(metric.missing_source_kinds(), vec![MetricSourceKind::Sonar]);
        assert_eq!(
            metric.report(MAX_SUBJECT_LENGTH).unwrap(),
            "The component size of Core could not be measured because not all required sources are configured. \
             Configure the following source(s): SonarQube."
        );
    }

    #[test]
    fn test_missing_sonar_id_is_missing_source() {
        let project = project(vec![sonar("sonar", RecordedProvider::new())]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());

        assert_eq!(metric.status(), Status::MissingSource);
        assert!(metric.missing_source_kinds().is_empty());
        assert_eq!(metric.missing_source_id_kinds(), vec![MetricSourceKind::Sonar]);
        assert!(metric.report(MAX_SUBJECT_LENGTH).unwrap().contains("Configure ids for the following source(s): SonarQube."));
    }

    #[test]
    fn test_empty_sonar_id_is_missing_source() {
        let project = project(vec![sonar("sonar", RecordedProvider::new().with_value(Quantity::Ncloc, 500.0))]);
        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", Vec::<String>::new()));
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());

        assert_eq!(metric.status(), Status::MissingSource);
        assert_eq!(metric.missing_source_id_kinds(), vec![MetricSourceKind::Sonar]);
        assert!(metric.is_missing());
    }

    #[test]
    fn test_unavailable_value_is_missing() {
        let project = project(vec![sonar("sonar", RecordedProvider::new())]);
        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", ["core"]));
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());

        assert!((metric.value() - MISSING_VALUE).abs() < f64::EPSILON);
        assert_eq!(metric.status(), Status::Missing);
        assert_eq!(
            metric.report(MAX_SUBJECT_LENGTH).unwrap(),
            "The component size of Core could not be measured because not all required sources are available."
        );
    }

    #[test]
    fn test_missing_wins_over_perfect() {
        let project = project(vec![jira(RecordedProvider::new())]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.status(), Status::Missing);
    }

    #[test]
    fn test_lower_is_better_statuses() {
        for (bugs, expected) in [
            (0.0, Status::Perfect),
            (50.0, Status::Green),
            (51.0, Status::Yellow),
            (100.0, Status::Yellow),
            (101.0, Status::Red),
        ] {
            let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, bugs))]);
            let subject = component(MeasurableObject::new());
            let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());
            assert_eq!(metric.status(), expected, "{bugs} open bugs");
        }
    }

    #[test]
    fn test_higher_is_better_statuses() {
        for (points, expected) in [(25.0, Status::Green), (15.0, Status::Yellow), (5.0, Status::Red)] {
            let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::ReadyStoryPoints, points))]);
            let subject = component(MeasurableObject::new());
            let metric = Metric::new(def(MetricKind::ReadyUserStoryPoints), &subject, &project, now());
            assert_eq!(metric.status(), expected, "{points} points");
        }
    }

    #[test]
    fn test_subject_overrides_targets() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 15.0))]);
        let subject = open_bugs_options(MetricOptions {
            target: Some(10.0),
            low_target: Some(20.0),
            ..MetricOptions::default()
        });
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert!((metric.target() - 10.0).abs() < f64::EPSILON);
        assert!((metric.low_target() - 20.0).abs() < f64::EPSILON);
        assert_eq!(metric.status(), Status::Yellow);
        assert_eq!(
            metric.norm().unwrap(),
            "At most 10 open bug reports. More than 20 open bug reports is red."
        );
    }

    #[test]
    fn test_accepted_debt_is_grey_even_when_stale() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 120.0))]);
        let subject = open_bugs_options(MetricOptions {
            debt_target: Some(TechnicalDebtTarget::fixed(150.0, "Legacy backlog.")),
            old_age: Some(TimeDelta::days(1)),
            max_old_age: Some(TimeDelta::days(2)),
            ..MetricOptions::default()
        });
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.status(), Status::Grey);
        assert_eq!(
            metric.comment(),
            "The currently accepted technical debt is 150 open bug reports. Legacy backlog."
        );
    }

    #[test]
    fn test_debt_exceeded_is_red() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 160.0))]);
        let subject = open_bugs_options(MetricOptions {
            debt_target: Some(TechnicalDebtTarget::fixed(150.0, "")),
            ..MetricOptions::default()
        });
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.status(), Status::Red);
    }

    #[test]
    fn test_staleness_without_date_is_red() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 0.0))]);
        let subject = open_bugs_options(MetricOptions {
            max_old_age: Some(TimeDelta::days(2)),
            ..MetricOptions::default()
        });
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.age(), TimeDelta::MAX);
        assert_eq!(metric.status(), Status::Red);
    }

    fn regression_tests(days_ago: i64, failed: f64) -> Project {
        let provider = RecordedProvider::new()
            .with_id_value("art", Quantity::FailedTests, failed)
            .with_id_date("art", now() - TimeDelta::days(days_ago));
        project(vec![
            MetricSource::new("junit", MetricSourceKind::JunitTestReport, "https://ci.example.org/junit/", provider)
                .with_url_template("https://ci.example.org/junit/{id}.xml"),
        ])
    }

    #[test]
    fn test_age_and_value_checks_are_combined() {
        let subject = component(MeasurableObject::new().with_metric_source_ids("junit", ["art"]));

        for (days_ago, failed, expected) in [
            (1, 0.0, Status::Perfect),
            (4, 0.0, Status::Yellow),
            (6, 0.0, Status::Red),
            (1, 2.0, Status::Red),
        ] {
            let project = regression_tests(days_ago, failed);
            let metric = Metric::new(def(MetricKind::FailingRegressionTests), &subject, &project, now());
            assert_eq!(metric.status(), expected, "{failed} failed {days_ago} days ago");
        }
    }

    #[test]
    fn test_report_templates() {
        let subject = component(MeasurableObject::new().with_metric_source_ids("junit", ["art"]));

        let project = regression_tests(1, 0.0);
        let metric = Metric::new(def(MetricKind::FailingRegressionTests), &subject, &project, now());
        assert_eq!(
            metric.report(MAX_SUBJECT_LENGTH).unwrap(),
            "All regression tests of Core pass (test report of 31 May)."
        );

        let project = regression_tests(1, 3.0);
        let metric = Metric::new(def(MetricKind::FailingRegressionTests), &subject, &project, now());
        assert_eq!(
            metric.report(MAX_SUBJECT_LENGTH).unwrap(),
            "3 regression tests of Core fail (test report of 31 May)."
        );
        assert_eq!(
            metric.url(),
            BTreeMap::from([("JUnit test report".to_string(), "https://ci.example.org/junit/art.xml".to_string())])
        );
    }

    #[test]
    fn test_report_truncates_subject_name() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 3.0))]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.report(2).unwrap(), "Co... has 3 open bug reports.");
        assert_eq!(metric.report(MAX_SUBJECT_LENGTH).unwrap(), "Core has 3 open bug reports.");
    }

    #[test]
    fn test_unknown_template_parameter_fails() {
        let broken = MetricDef {
            norm_template: "At most {velocity} bugs.",
            ..def(MetricKind::OpenBugs).clone()
        };
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 3.0))]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(&broken, &subject, &project, now());

        let err = metric.norm().unwrap_err();
        assert!(err.to_string().contains("velocity"));
    }

    #[test]
    fn test_higher_percentage_perfect() {
        let provider = RecordedProvider::new()
            .with_id_value("app", Quantity::CoveredStatements, 250.0)
            .with_id_value("app", Quantity::Statements, 250.0)
            .with_id_date("app", now());
        let project = project(vec![MetricSource::new(
            "coverage",
            MetricSourceKind::CoverageReport,
            "https://coverage.example.org/",
            provider,
        )]);
        let subject = component(MeasurableObject::new().with_metric_source_ids("coverage", ["app"]));
        let metric = Metric::new(def(MetricKind::ArtStatementCoverage), &subject, &project, now());

        assert!((metric.value() - 100.0).abs() < f64::EPSILON);
        assert_eq!(metric.status(), Status::Perfect);
        assert_eq!(metric.y_axis_range(), (0, 100));
    }

    fn coverage(covered: f64, statements: f64) -> Project {
        let provider = RecordedProvider::new()
            .with_id_value("app", Quantity::CoveredStatements, covered)
            .with_id_value("app", Quantity::Statements, statements)
            .with_id_date("app", now());
        project(vec![MetricSource::new(
            "coverage",
            MetricSourceKind::CoverageReport,
            "https://coverage.example.org/",
            provider,
        )])
    }

    #[test]
    fn test_rounded_percentage_perfect() {
        let project = coverage(999.0, 1000.0);
        let subject = component(MeasurableObject::new().with_metric_source_ids("coverage", ["app"]));
        let metric = Metric::new(def(MetricKind::ArtStatementCoverage), &subject, &project, now());

        assert!((metric.value() - 100.0).abs() < f64::EPSILON);
        assert_eq!(metric.status(), Status::Perfect);
    }

    #[test]
    fn test_percentage_parameters() {
        let covered = MetricDef {
            template: "{name} covers {numerator} of {denominator} statements ({value}%).",
            ..def(MetricKind::ArtStatementCoverage).clone()
        };
        let project = coverage(200.0, 250.0);
        let subject = component(MeasurableObject::new().with_metric_source_ids("coverage", ["app"]));
        let metric = Metric::new(&covered, &subject, &project, now());

        assert_eq!(metric.report(MAX_SUBJECT_LENGTH).unwrap(), "Core covers 200 of 250 statements (80%).");
    }

    #[test]
    fn test_lower_percentage() {
        for (duplicated, lines, value, expected) in [
            (0.0, 0.0, 0.0, Status::Perfect),
            (0.0, 100.0, 0.0, Status::Perfect),
            (4.0, 1000.0, 0.0, Status::Perfect),
            (3.0, 100.0, 3.0, Status::Yellow),
            (10.0, 100.0, 10.0, Status::Red),
        ] {
            let provider = RecordedProvider::new()
                .with_id_value("core", Quantity::DuplicatedLines, duplicated)
                .with_id_value("core", Quantity::Lines, lines);
            let project = project(vec![sonar("sonar", provider)]);
            let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", ["core"]));
            let metric = Metric::new(def(MetricKind::Duplication), &subject, &project, now());

            assert!((metric.value() - value).abs() < f64::EPSILON, "{duplicated}/{lines}");
            assert_eq!(metric.status(), expected, "{duplicated}/{lines}");
        }
    }

    #[test]
    fn test_percentage_with_missing_part_is_missing() {
        let provider = RecordedProvider::new().with_id_value("core", Quantity::DuplicatedLines, 3.0);
        let project = project(vec![sonar("sonar", provider)]);
        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", ["core"]));
        let metric = Metric::new(def(MetricKind::Duplication), &subject, &project, now());

        assert_eq!(metric.status(), Status::Missing);
    }

    #[test]
    fn test_first_candidate_with_id_is_measured() {
        let project = project(vec![
            sonar("sonar-1", RecordedProvider::new().with_id_value("a", Quantity::Ncloc, 100.0)),
            sonar("sonar-2", RecordedProvider::new().with_id_value("b", Quantity::Ncloc, 200.0)),
        ]);

        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar-2", ["b"]));
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());
        assert_eq!(metric.metric_source().unwrap().name(), "sonar-2");
        assert!((metric.value() - 200.0).abs() < f64::EPSILON);

        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());
        assert!(metric.metric_source().is_none());
        assert_eq!(metric.status(), Status::MissingSource);
    }

    #[test]
    fn test_urls() {
        let provider = RecordedProvider::new()
            .with_id_value("a", Quantity::Ncloc, 100.0)
            .with_id_value("b", Quantity::Ncloc, 200.0);
        let project = project(vec![sonar("sonar", provider), jira(RecordedProvider::new())]);

        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", ["a", "b"]));
        let metric = Metric::new(def(MetricKind::ProductLoc), &subject, &project, now());
        assert!((metric.value() - 300.0).abs() < f64::EPSILON);
        assert_eq!(
            metric.url(),
            BTreeMap::from([
                ("SonarQube (1/2)".to_string(), "https://sonar.example.org/dashboard?id=a".to_string()),
                ("SonarQube (2/2)".to_string(), "https://sonar.example.org/dashboard?id=b".to_string()),
            ])
        );

        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());
        assert_eq!(
            metric.url(),
            BTreeMap::from([("Jira".to_string(), "https://jira.example.org/".to_string())])
        );

        let metric = Metric::new(def(MetricKind::FailingCiJobs), &subject, &project, now());
        assert!(metric.url().is_empty());
    }

    #[test]
    fn test_ids() {
        let project = project(vec![]);
        let subject = component(MeasurableObject::new());
        let mut metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.stable_id(), "OpenBugsCore");
        assert_eq!(metric.id_string(), "OpenBugsCore");
        metric.set_id_string("CO-3");
        assert_eq!(metric.id_string(), "CO-3");
        assert_eq!(metric.stable_id(), "OpenBugsCore");
    }

    #[derive(Debug)]
    struct AllProducts;

    impl MeasurableSubject for AllProducts {
        fn name(&self) -> &str {
            "All products"
        }

        fn is_collection(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_collection_stable_id() {
        let project = project(vec![]);
        let metric = Metric::new(def(MetricKind::ProductLoc), &AllProducts, &project, now());
        assert_eq!(metric.stable_id(), "ProductLoc");
    }

    #[test]
    fn test_history() {
        let history: FileHistory = concat!(
            r#"{"OpenBugsCore": [1, "green", "2024-05-01 08:00:00"]}"#,
            "\n",
            r#"{"OpenBugsCore": [4, "green", "2024-05-01 08:00:00"]}"#,
            "\n",
            r#"{"OpenBugsCore": [5, "green", "2024-05-01 08:00:00"]}"#,
            "\n",
            r#"{"OpenBugsCore": [2, "green", "2024-05-01 08:00:00"]}"#,
        )
        .parse()
        .unwrap();
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 2.0))]).with_history(history);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.recent_history(), vec![1, 4, 5, 2]);
        assert_eq!(metric.y_axis_range(), (1, 5));
        assert_eq!(
            metric.status_start_date(),
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_flat_history_widens_range() {
        let history: FileHistory = r#"{"OpenBugsCore": 5}"#.parse().unwrap();
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 5.0))]).with_history(history);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert_eq!(metric.y_axis_range(), (4, 6));
        assert_eq!(metric.status_start_date(), now());
    }

    #[test]
    fn test_without_history() {
        let project = project(vec![jira(RecordedProvider::new().with_value(Quantity::OpenBugs, 5.0))]);
        let subject = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());

        assert!(metric.recent_history().is_empty());
        assert_eq!(metric.y_axis_range(), (0, 100));
        assert_eq!(metric.status_start_date(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_comment_without_debt() {
        let project = project(vec![]);
        let subject = open_bugs_options(MetricOptions {
            comment: Some("Bugs are triaged weekly.".into()),
            ..MetricOptions::default()
        });
        let metric = Metric::new(def(MetricKind::OpenBugs), &subject, &project, now());
        assert_eq!(metric.comment(), "Bugs are triaged weekly.");

        let plain = component(MeasurableObject::new());
        let metric = Metric::new(def(MetricKind::OpenBugs), &plain, &project, now());
        assert_eq!(metric.comment(), "");
    }

    #[test]
    fn test_days_since_analysis() {
        let provider = RecordedProvider::new().with_id_date("core", now() - TimeDelta::days(5));
        let project = project(vec![sonar("sonar", provider)]);
        let subject = component(MeasurableObject::new().with_metric_source_ids("sonar", ["core"]));
        let metric = Metric::new(def(MetricKind::SonarAnalysisAge), &subject, &project, now());

        assert!((metric.value() - 5.0).abs() < f64::EPSILON);
        assert_eq!(metric.status(), Status::Yellow);
        assert_eq!(
            metric.report(MAX_SUBJECT_LENGTH).unwrap(),
            "The latest SonarQube analysis of Core is 5 days old (27 May)."
        );
    }
}
