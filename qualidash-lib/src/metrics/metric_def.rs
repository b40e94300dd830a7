use super::Direction;
use super::template::{Parameters, render};
use crate::Result;
use crate::domain::{MeasurableSubject, MetricKind, format_age};
use crate::metric_source::{MISSING_VALUE, MetricSource, MetricSourceKind, Quantity};
use chrono::{DateTime, TimeDelta, Utc};

/// What a metric measures from its metric source.
#[derive(Debug, Clone, Copy)]
pub enum Measure {
    /// The value is measured directly.
    Value(fn(&Measurement<'_>) -> f64),

    /// The value is a whole percentage computed from two measured quantities.
    Percentage {
        numerator: fn(&Measurement<'_>) -> f64,
        denominator: fn(&Measurement<'_>) -> f64,
    },
}

/// Access to the metric source of a metric, narrowed to the subject being measured.
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    source: &'a MetricSource,
    ids: &'a [String],
    now: DateTime<Utc>,
}

impl<'a> Measurement<'a> {
    #[must_use]
    pub const fn new(source: &'a MetricSource, ids: &'a [String], now: DateTime<Utc>) -> Self {
        Self { source, ids, now }
    }

    /// Measure a quantity for the subject, -1 if the source could not deliver it.
    #[must_use]
    pub fn quantity(&self, quantity: Quantity) -> f64 {
        self.source.measure(quantity, self.ids)
    }

    /// The date of the subject's latest measurement, the minimal date if unknown.
    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        self.source.datetime(self.ids)
    }

    /// Whole days since the subject's latest measurement, -1 if the date is unknown.
    #[must_use]
    pub fn days_since_measurement(&self) -> f64 {
        let date = self.datetime();
        if date == DateTime::<Utc>::MIN_UTC {
            return MISSING_VALUE;
        }

        #[expect(clippy::cast_precision_loss, reason = "day counts are far below 2^52")]
        let days = (self.now - date).num_days() as f64;
        days
    }
}

/// The static definition of a kind of metric.
#[derive(Debug, Clone)]
pub struct MetricDef {
    pub kind: MetricKind,
    pub name: &'static str,

    /// Unit in plural, or `%`.
    pub unit: &'static str,
    pub direction: Direction,
    pub target_value: f64,
    pub low_target_value: f64,

    /// The value that cannot be improved upon. Lower-is-better metrics default to zero.
    pub perfect_value: Option<f64>,
    pub measure: Measure,
    pub date: fn(&Measurement<'_>) -> Option<DateTime<Utc>>,
    pub old_age: TimeDelta,
    pub max_old_age: TimeDelta,

    /// The kinds of metric source the metric needs; the first one is measured.
    pub metric_source_kinds: &'static [MetricSourceKind],
    pub url_label: &'static str,
    pub norm_template: &'static str,
    pub template: &'static str,
    pub perfect_template: &'static str,
    pub missing_template: &'static str,
    pub missing_source_template: &'static str,
    pub missing_source_id_template: &'static str,
}

const BASE: MetricDef = MetricDef {
    kind: MetricKind::ProductLoc,
    name: "",
    unit: "",
    direction: Direction::LowerIsBetter,
    target_value: 0.0,
    low_target_value: 0.0,
    perfect_value: None,
    measure: Measure::Value(|_| MISSING_VALUE),
    date: |_| None,
    old_age: TimeDelta::MAX,
    max_old_age: TimeDelta::MAX,
    metric_source_kinds: &[],
    url_label: "",
    norm_template: "",
    template: "{name} has {value} {unit}.",
    perfect_template: "",
    missing_template: "The {metric} of {name} could not be measured because not all required sources are available.",
    missing_source_template: "The {metric} of {name} could not be measured because not all required sources are configured. \
                              Configure the following source(s): {missing_source_classes}.",
    missing_source_id_template: "The {metric} of {name} could not be measured because not all required source ids are \
                                 configured. Configure ids for the following source(s): {missing_source_id_classes}.",
};

macro_rules! metric_def {
    ($kind:ident, $direction:ident, $($field:ident: $value:expr),+ $(,)?) => {
        MetricDef {
            kind: MetricKind::$kind,
            direction: Direction::$direction,
            $($field: $value,)+
            ..BASE
        }
    };
}

fn measured_date(measurement: &Measurement<'_>) -> Option<DateTime<Utc>> {
    Some(measurement.datetime())
}

fn rounded(value: f64) -> f64 {
    value.round_ties_even()
}

pub const METRIC_DEFINITIONS: &[MetricDef] = &[
    metric_def!(
        ProductLoc,
        LowerIsBetter,
        name: "Component size",
        unit: "lines of code",
        target_value: 50_000.0,
        low_target_value: 100_000.0,
        measure: Measure::Value(|m| m.quantity(Quantity::Ncloc)),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "The size of a component is at most {target} {unit}. More than {low_target} {unit} is red.",
    ),
    metric_def!(
        BlockerViolations,
        LowerIsBetter,
        name: "Blocker violations",
        unit: "blocker violations",
        target_value: 0.0,
        low_target_value: 0.0,
        measure: Measure::Value(|m| m.quantity(Quantity::BlockerViolations)),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At most {target} {unit}. More than {low_target} {unit} is red.",
    ),
    metric_def!(
        CriticalViolations,
        LowerIsBetter,
        name: "Critical violations",
        unit: "critical violations",
        target_value: 0.0,
        low_target_value: 1.0,
        measure: Measure::Value(|m| m.quantity(Quantity::CriticalViolations)),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At most {target} {unit}. More than {low_target} {unit} is red.",
    ),
    metric_def!(
        MajorViolations,
        LowerIsBetter,
        name: "Major violations",
        unit: "major violations",
        target_value: 25.0,
        low_target_value: 50.0,
        measure: Measure::Value(|m| m.quantity(Quantity::MajorViolations)),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At most {target} {unit}. More than {low_target} {unit} is red.",
    ),
    metric_def!(
        Duplication,
        LowerIsBetter,
        name: "Duplication",
        unit: "%",
        target_value: 0.0,
        low_target_value: 5.0,
        measure: Measure::Percentage {
            numerator: |m| m.quantity(Quantity::DuplicatedLines),
            denominator: |m| m.quantity(Quantity::Lines),
        },
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At most {target}{unit} of the lines of code is duplicated. More than {low_target}{unit} is red.",
        template: "{name} has {value}{unit} duplicated lines of code.",
    ),
    metric_def!(
        SonarAnalysisAge,
        LowerIsBetter,
        name: "SonarQube analysis age",
        unit: "days",
        target_value: 3.0,
        low_target_value: 7.0,
        measure: Measure::Value(|m| m.days_since_measurement()),
        date: measured_date,
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "The latest SonarQube analysis is at most {target} {unit} old. Older than {low_target} {unit} is red.",
        template: "The latest SonarQube analysis of {name} is {value} {unit} old ({date}).",
    ),
    metric_def!(
        FailingUnittests,
        LowerIsBetter,
        name: "Failing unit tests",
        unit: "unit tests",
        target_value: 0.0,
        low_target_value: 0.0,
        measure: Measure::Value(|m| m.quantity(Quantity::FailingUnittests)),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "All unit tests pass.",
        template: "{value} {unit} of {name} fail.",
        perfect_template: "All {unit} of {name} pass.",
    ),
    metric_def!(
        UnittestLineCoverage,
        HigherIsBetter,
        name: "Unit test line coverage",
        unit: "%",
        target_value: 98.0,
        low_target_value: 90.0,
        perfect_value: Some(100.0),
        measure: Measure::Value(|m| rounded(m.quantity(Quantity::LineCoverage))),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At least {target}{unit} of the lines of code is covered by unit tests. Less than {low_target}{unit} is red.",
        template: "{name} unit test line coverage is {value}{unit}.",
    ),
    metric_def!(
        UnittestBranchCoverage,
        HigherIsBetter,
        name: "Unit test branch coverage",
        unit: "%",
        target_value: 80.0,
        low_target_value: 60.0,
        perfect_value: Some(100.0),
        measure: Measure::Value(|m| rounded(m.quantity(Quantity::BranchCoverage))),
        metric_source_kinds: &[MetricSourceKind::Sonar],
        url_label: "SonarQube",
        norm_template: "At least {target}{unit} of the code branches is covered by unit tests. Less than {low_target}{unit} is red.",
        template: "{name} unit test branch coverage is {value}{unit}.",
    ),
    metric_def!(
        FailingRegressionTests,
        LowerIsBetter,
        name: "Failing regression tests",
        unit: "regression tests",
        target_value: 0.0,
        low_target_value: 0.0,
        measure: Measure::Value(|m| m.quantity(Quantity::FailedTests)),
        date: measured_date,
        old_age: TimeDelta::days(3),
        max_old_age: TimeDelta::days(5),
        metric_source_kinds: &[MetricSourceKind::JunitTestReport],
        url_label: "Test report",
        norm_template: "All regression tests pass and the test report is at most {old_age} old. \
                        A test report older than {max_old_age} is red.",
        template: "{value} {unit} of {name} fail (test report of {date}).",
        perfect_template: "All {unit} of {name} pass (test report of {date}).",
    ),
    metric_def!(
        ArtStatementCoverage,
        HigherIsBetter,
        name: "Automated regression test statement coverage",
        unit: "%",
        target_value: 80.0,
        low_target_value: 70.0,
        perfect_value: Some(100.0),
        measure: Measure::Percentage {
            numerator: |m| m.quantity(Quantity::CoveredStatements),
            denominator: |m| m.quantity(Quantity::Statements),
        },
        date: measured_date,
        metric_source_kinds: &[MetricSourceKind::CoverageReport],
        url_label: "Coverage report",
        norm_template: "At least {target}{unit} of the statements is covered by automated regression tests. \
                        Less than {low_target}{unit} is red.",
        template: "{name} automated regression test statement coverage is {value}{unit} (measured {date}).",
    ),
    metric_def!(
        PerformanceLoadTestErrors,
        LowerIsBetter,
        name: "Performance load test errors",
        unit: "performance load test cases",
        target_value: 0.0,
        low_target_value: 0.0,
        measure: Measure::Value(|m| m.quantity(Quantity::ResponseTimeErrors)),
        date: measured_date,
        old_age: TimeDelta::days(7),
        max_old_age: TimeDelta::days(14),
        metric_source_kinds: &[MetricSourceKind::PerformanceReport],
        url_label: "Performance report",
        norm_template: "The product has no {unit} that exceed the maximum response times, in a test report at most \
                        {old_age} old. A test report older than {max_old_age} is red.",
        template: "{value} {unit} of {name} exceed the maximum response times (test report of {date}).",
    ),
    metric_def!(
        UnmergedBranches,
        LowerIsBetter,
        name: "Unmerged branches",
        unit: "branches",
        target_value: 0.0,
        low_target_value: 1.0,
        measure: Measure::Value(|m| m.quantity(Quantity::UnmergedBranches)),
        metric_source_kinds: &[MetricSourceKind::Git],
        url_label: "Git",
        norm_template: "At most {target} unmerged {unit}. More than {low_target} unmerged {unit} is red.",
        template: "{name} has {value} unmerged {unit}.",
    ),
    metric_def!(
        DocumentAge,
        LowerIsBetter,
        name: "Document age",
        unit: "days",
        target_value: 180.0,
        low_target_value: 360.0,
        measure: Measure::Value(|m| m.days_since_measurement()),
        date: measured_date,
        metric_source_kinds: &[MetricSourceKind::Git],
        url_label: "Git",
        norm_template: "The document is updated at least once every {target} {unit}. \
                        Not updated for more than {low_target} {unit} is red.",
        template: "{name} was last updated {value} {unit} ago ({date}).",
    ),
    metric_def!(
        OpenBugs,
        LowerIsBetter,
        name: "Open bugs",
        unit: "open bug reports",
        target_value: 50.0,
        low_target_value: 100.0,
        measure: Measure::Value(|m| m.quantity(Quantity::OpenBugs)),
        metric_source_kinds: &[MetricSourceKind::Jira],
        url_label: "Jira",
        norm_template: "At most {target} {unit}. More than {low_target} {unit} is red.",
    ),
    metric_def!(
        ReadyUserStoryPoints,
        HigherIsBetter,
        name: "Ready user story points",
        unit: "ready user story points",
        target_value: 20.0,
        low_target_value: 10.0,
        measure: Measure::Value(|m| m.quantity(Quantity::ReadyStoryPoints)),
        metric_source_kinds: &[MetricSourceKind::Jira],
        url_label: "Jira",
        norm_template: "At least {target} {unit}. Fewer than {low_target} {unit} is red.",
    ),
    metric_def!(
        FailingCiJobs,
        LowerIsBetter,
        name: "Failing CI jobs",
        unit: "failing CI jobs",
        target_value: 0.0,
        low_target_value: 2.0,
        measure: Measure::Value(|m| m.quantity(Quantity::FailingJobs)),
        metric_source_kinds: &[MetricSourceKind::Jenkins],
        url_label: "Jenkins",
        norm_template: "At most {target} {unit}. More than {low_target} {unit} is red.",
    ),
];

impl MetricDef {
    /// Look up the definition of a kind of metric.
    #[must_use]
    pub fn for_kind(kind: MetricKind) -> Option<&'static Self> {
        METRIC_DEFINITIONS.iter().find(|def| def.kind == kind)
    }

    /// The value that cannot be improved upon, if any.
    #[must_use]
    pub fn perfect_value(&self) -> Option<f64> {
        match self.direction {
            Direction::LowerIsBetter => Some(self.perfect_value.unwrap_or(0.0)),
            Direction::HigherIsBetter => self.perfect_value,
        }
    }

    #[must_use]
    pub const fn is_percentage(&self) -> bool {
        matches!(self.measure, Measure::Percentage { .. })
    }

    /// Whether 0/0 counts as 0% rather than 100%, which holds for lower-is-better percentages.
    #[must_use]
    pub const fn zero_divided_by_zero_is_zero(&self) -> bool {
        matches!(self.direction, Direction::LowerIsBetter)
    }

    /// The kind of metric source that is measured, if the metric needs one.
    #[must_use]
    pub fn primary_metric_source_kind(&self) -> Option<MetricSourceKind> {
        self.metric_source_kinds.first().copied()
    }

    /// Whether the subject requires this metric.
    #[must_use]
    pub fn should_be_measured(&self, subject: &dyn MeasurableSubject) -> bool {
        subject.required_metric_kinds().contains(&self.kind)
    }

    /// The name of the metric as used within a sentence.
    #[must_use]
    pub fn lowercase_name(&self) -> String {
        let mut chars = self.name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_lowercase().chain(chars).collect()
        })
    }

    /// The norm of the metric with the default targets and ages.
    ///
    /// # Errors
    ///
    /// Returns an error if the norm template refers to an unknown parameter.
    pub fn default_norm(&self) -> Result<String> {
        let mut parameters = Parameters::new();
        let _ = parameters.insert("unit", self.unit.to_string());
        let _ = parameters.insert("target", self.target_value.to_string());
        let _ = parameters.insert("low_target", self.low_target_value.to_string());
        let _ = parameters.insert("old_age", format_age(self.old_age));
        let _ = parameters.insert("max_old_age", format_age(self.max_old_age));

        render(self.norm_template, &parameters)
    }
}
