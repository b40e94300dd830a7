use super::Section;
use super::reportable::ReportableSection;
use crate::Result;
use crate::domain::{MeasurableSubject, MetricKind, Project, Status, Subject};
use crate::metric_source::MetricSourceKind;
use crate::metrics::{METRIC_DEFINITIONS, Metric};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

const LOG_TARGET: &str = "    report";

/// A quality report on a project, evaluated at a fixed instant.
///
/// The report has a section for the project itself (`PC`), one for its documents (`PD`), one per
/// product and one per team. Sections without metrics are left out.
#[derive(Debug)]
pub struct QualityReport<'a> {
    project: &'a Project,
    now: DateTime<Utc>,
    sections: Vec<Section<'a>>,
}

impl<'a> QualityReport<'a> {
    #[must_use]
    pub fn new(project: &'a Project, now: DateTime<Utc>) -> Self {
        let mut sections = vec![
            Section::new("PC", "Process quality", "", required_metrics(project.subject(), project, now)),
            Section::new(
                "PD",
                "Product quality overall",
                "",
                project
                    .documents()
                    .iter()
                    .flat_map(|document| required_metrics(document, project, now))
                    .collect(),
            ),
        ];

        for product in sorted_products(project) {
            sections.push(
                Section::new(
                    product.short_name(),
                    product.name(),
                    product.kind().to_string(),
                    required_metrics(product, project, now),
                )
                .with_product(product),
            );
        }

        for team in sorted_teams(project) {
            sections.push(Section::new(
                team.short_name(),
                format!("Team {}", team.name()),
                "",
                required_metrics(team, project, now),
            ));
        }

        sections.retain(|section| !section.is_empty());

        for section in &sections {
            log::debug!(
                target: LOG_TARGET,
                "Section {} '{}' has {} metrics",
                section.id_prefix(),
                section.title(),
                section.metrics().len()
            );
        }

        Self { project, now, sections }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Quality report {}/{}", self.project.organization(), self.project.name())
    }

    #[must_use]
    pub const fn project(&self) -> &'a Project {
        self.project
    }

    /// The instant the report was evaluated at.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    #[must_use]
    pub fn get_section(&self, id_prefix: &str) -> Option<&Section<'a>> {
        self.sections.iter().find(|section| section.id_prefix() == id_prefix)
    }

    #[must_use]
    pub fn get_product_section(&self, product_name: &str) -> Option<&Section<'a>> {
        self.sections
            .iter()
            .find(|section| section.product().is_some_and(|product| product.name() == product_name))
    }

    /// All metrics of the report, in section order.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric<'a>> {
        self.sections.iter().flat_map(Section::metrics)
    }

    /// Products in report order: by name, then by short name.
    #[must_use]
    pub fn products(&self) -> Vec<&'a Subject> {
        sorted_products(self.project)
    }

    #[must_use]
    pub fn teams(&self) -> Vec<&'a Subject> {
        sorted_teams(self.project)
    }

    /// The kinds of metric included in the report.
    #[must_use]
    pub fn included_metric_kinds(&self) -> BTreeSet<MetricKind> {
        self.metrics().map(Metric::kind).collect()
    }

    /// The kinds of metric source configured for the project.
    #[must_use]
    pub fn included_metric_source_kinds(&self) -> BTreeSet<MetricSourceKind> {
        self.project.metric_source_kinds()
    }

    /// Whether any metric is red or missing. A report without metrics needs action as well.
    #[must_use]
    pub fn direct_action_needed(&self) -> bool {
        let mut metrics = self.metrics().peekable();
        if metrics.peek().is_none() {
            return true;
        }

        metrics.any(|metric| matches!(metric.status(), Status::Red | Status::Missing | Status::MissingSource))
    }

    /// Render every metric of the report into report-ready sections.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric text cannot be rendered.
    pub fn reportable_sections(&self) -> Result<Vec<ReportableSection>> {
        self.sections.iter().map(ReportableSection::new).collect()
    }
}

fn required_metrics<'a>(subject: &'a Subject, project: &'a Project, now: DateTime<Utc>) -> Vec<Metric<'a>> {
    METRIC_DEFINITIONS
        .iter()
        .filter(|def| def.should_be_measured(subject))
        .map(|def| Metric::new(def, subject, project, now))
        .collect()
}

fn sorted_products(project: &Project) -> Vec<&Subject> {
    let mut products: Vec<&Subject> = project.products().iter().collect();
    products.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.short_name().cmp(b.short_name())));
    products
}

fn sorted_teams(project: &Project) -> Vec<&Subject> {
    let mut teams: Vec<&Subject> = project.teams().iter().collect();
    teams.sort_by(|a, b| a.name().cmp(b.name()));
    teams
}
