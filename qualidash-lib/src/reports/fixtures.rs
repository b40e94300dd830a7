use super::{ReportableMetric, ReportableSection, SectionColor};
use crate::domain::{MetricKind, Status};
use crate::metric_source::MISSING_VALUE;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

pub fn open_bugs() -> ReportableMetric {
    ReportableMetric {
        id: "PC-1".to_string(),
        stable_id: "OpenBugsExample".to_string(),
        kind: MetricKind::OpenBugs,
        name: "Open bugs".to_string(),
        subject: "Example".to_string(),
        status: Status::Yellow,
        status_start_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()),
        value: 75.0,
        unit: "open bug reports".to_string(),
        report: "Example has 75 open bug reports.".to_string(),
        norm: "At most 50 open bug reports. More than 100 open bug reports is red.".to_string(),
        comment: "Triaged weekly, see \"bugs\", team A".to_string(),
        url_label: "Jira".to_string(),
        urls: BTreeMap::from([("Jira".to_string(), "https://jira.example.org/".to_string())]),
        recent_history: vec![60, 70, 75],
        y_axis_range: (60, 75),
    }
}

pub fn missing_coverage() -> ReportableMetric {
    ReportableMetric {
        id: "CO-1".to_string(),
        stable_id: "ArtStatementCoverageCore".to_string(),
        kind: MetricKind::ArtStatementCoverage,
        name: "Automated regression test statement coverage".to_string(),
        subject: "Core".to_string(),
        status: Status::MissingSource,
        status_start_date: None,
        value: MISSING_VALUE,
        unit: "%".to_string(),
        report: "The automated regression test statement coverage of Core could not be measured.".to_string(),
        norm: "At least 80% of the statements is covered by automated regression tests.".to_string(),
        comment: String::new(),
        url_label: "Coverage report".to_string(),
        urls: BTreeMap::new(),
        recent_history: Vec::new(),
        y_axis_range: (0, 100),
    }
}

pub fn sections() -> Vec<ReportableSection> {
    vec![
        ReportableSection {
            id_prefix: "PC".to_string(),
            title: "Process quality".to_string(),
            subtitle: String::new(),
            color: SectionColor::Yellow,
            metrics: vec![open_bugs()],
        },
        ReportableSection {
            id_prefix: "CO".to_string(),
            title: "Core".to_string(),
            subtitle: "component".to_string(),
            color: SectionColor::Red,
            metrics: vec![missing_coverage()],
        },
    ]
}
