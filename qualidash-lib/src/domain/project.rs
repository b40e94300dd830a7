use super::{MeasurableSubject, Subject, SubjectKind};
use crate::Result;
use crate::metric_source::{History, MetricSource, MetricSourceKind, MetricSources, NoHistory};
use ohno::app_err;
use std::collections::BTreeSet;

const LOG_TARGET: &str = "   project";

/// Section abbreviations that are reserved for the project-wide report sections.
pub const RESERVED_SECTION_NAMES: [&str; 4] = ["MM", "PC", "PD", "PE"];

/// A software development or maintenance project: the root of everything that gets measured.
///
/// The project owns the configured metric source instances and the measurement history, and
/// groups the products, teams and documents that metrics are reported for. The project is a
/// measurable subject in its own right.
#[derive(Debug)]
pub struct Project {
    organization: String,
    subject: Subject,
    metric_sources: MetricSources,
    history: Box<dyn History>,
    products: Vec<Subject>,
    teams: Vec<Subject>,
    documents: Vec<Subject>,
    short_section_names: BTreeSet<String>,
}

impl Project {
    #[must_use]
    pub fn new(organization: impl Into<String>, subject: Subject, metric_sources: MetricSources) -> Self {
        Self {
            organization: organization.into(),
            subject,
            metric_sources,
            history: Box::new(NoHistory),
            products: Vec::new(),
            teams: Vec::new(),
            documents: Vec::new(),
            short_section_names: RESERVED_SECTION_NAMES.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: impl History + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// The project as a measurable subject.
    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.subject.name()
    }

    /// The configured instances of a kind of metric source, in configuration order.
    ///
    /// An empty slice means the kind of source is not configured for this project.
    #[must_use]
    pub fn metric_sources(&self, kind: MetricSourceKind) -> &[MetricSource] {
        self.metric_sources.get(kind)
    }

    /// The kinds of metric sources configured for this project.
    #[must_use]
    pub fn metric_source_kinds(&self) -> BTreeSet<MetricSourceKind> {
        self.metric_sources.kinds()
    }

    #[must_use]
    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    /// Add a product to the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a product or its short name is already in use.
    pub fn add_product(&mut self, product: Subject) -> Result<()> {
        if !matches!(product.kind(), SubjectKind::Component | SubjectKind::Application) {
            return Err(app_err!("'{}' is a {}, not a product", product.name(), product.kind()));
        }

        self.check_short_section_name(product.short_name())?;
        self.products.push(product);
        Ok(())
    }

    /// Add a team to the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a team or its short name is already in use.
    pub fn add_team(&mut self, team: Subject) -> Result<()> {
        if team.kind() != SubjectKind::Team {
            return Err(app_err!("'{}' is a {}, not a team", team.name(), team.kind()));
        }

        self.check_short_section_name(team.short_name())?;
        self.teams.push(team);
        Ok(())
    }

    /// Add a document to the project. Documents share one report section, so their short names are not checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a document.
    pub fn add_document(&mut self, document: Subject) -> Result<()> {
        if document.kind() != SubjectKind::Document {
            return Err(app_err!("'{}' is a {}, not a document", document.name(), document.kind()));
        }

        self.documents.push(document);
        Ok(())
    }

    #[must_use]
    pub fn products(&self) -> &[Subject] {
        &self.products
    }

    #[must_use]
    pub fn get_product(&self, name: &str) -> Option<&Subject> {
        self.products.iter().find(|product| product.name() == name)
    }

    #[must_use]
    pub fn teams(&self) -> &[Subject] {
        &self.teams
    }

    #[must_use]
    pub fn documents(&self) -> &[Subject] {
        &self.documents
    }

    fn check_short_section_name(&mut self, name: &str) -> Result<()> {
        if self.short_section_names.contains(name) {
            log::error!(
                target: LOG_TARGET,
                "Section abbreviation must be unique: {name} already used: {:?}",
                self.short_section_names
            );
            return Err(app_err!("section abbreviation {name} is not unique"));
        }

        let _ = self.short_section_names.insert(name.to_string());
        Ok(())
    }
}
