use crate::Result;
use crate::domain::{MeasurableObject, MetricKind, MetricOptions, Project, Requirement, Subject, SubjectKind, TechnicalDebtTarget};
use crate::metric_source::{
    DEFAULT_RECENT_HISTORY, FileHistory, MetricSource, MetricSourceKind, MetricSources, Quantity, RecordedProvider,
};
use crate::metrics::{Direction, MetricDef};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

const LOG_TARGET: &str = "    config";

/// The default project definition, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// The file name commands look for when no configuration path is given
pub const DEFAULT_CONFIG_FILE: &str = "qualidash.toml";

/// A project definition: the subjects to report on, the sources that measure them, and the norms they are held to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of the organization the project belongs to
    pub organization: String,

    /// Measurement history file, relative to the configuration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Utf8PathBuf>,

    /// Number of most recent history records to read
    #[serde(default = "default_recent_history")]
    pub recent_history: usize,

    pub project: SubjectConfig,

    #[serde(default)]
    pub products: Vec<SubjectConfig>,

    #[serde(default)]
    pub teams: Vec<SubjectConfig>,

    #[serde(default)]
    pub documents: Vec<SubjectConfig>,

    #[serde(default)]
    pub metric_sources: Vec<MetricSourceConfig>,
}

/// The project, a product, a team or a document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectConfig {
    pub name: String,

    /// Abbreviation that numbers the metrics of products and teams in reports
    #[serde(default)]
    pub short_name: String,

    /// Only meaningful for products, which are components unless stated otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SubjectKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Optional requirements to add to the defaults of the subject kind
    #[serde(default)]
    pub requirements: Vec<Requirement>,

    /// Default requirements to drop
    #[serde(default)]
    pub removed_requirements: Vec<Requirement>,

    /// The ids of the subject, keyed by metric source name
    #[serde(default)]
    pub metric_source_ids: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub metrics: BTreeMap<MetricKind, MetricOptionsConfig>,
}

/// Overrides of the norm of one metric for one subject.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricOptionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_target: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Age at which a measurement is considered old
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub old_age: Option<Duration>,

    /// Age at which a measurement is considered too old
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub max_old_age: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<DebtConfig>,
}

/// Accepted technical debt. Fixed unless the initial value and both dates are given.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebtConfig {
    pub value: f64,

    #[serde(default)]
    pub explanation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// A metric source instance and the measurements recorded for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSourceConfig {
    /// Name that subjects use to refer to this instance
    pub name: String,

    pub kind: MetricSourceKind,

    pub url: String,

    /// Link to a subject in the source; `{id}` is replaced by the subject's id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,

    /// Measurements of the source as a whole
    #[serde(default)]
    pub measurements: BTreeMap<Quantity, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Measurements per subject id
    #[serde(default)]
    pub ids: BTreeMap<String, RecordedConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecordedConfig {
    #[serde(default)]
    pub measurements: BTreeMap<Quantity, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

const fn default_recent_history() -> usize {
    DEFAULT_RECENT_HISTORY
}

impl Config {
    /// Load and validate a project definition
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the definition is inconsistent
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading qualidash configuration file '{path}'"))?;
        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
        config.validate().map_err(|e| app_err!("invalid configuration file '{path}': {e}"))?;

        log::debug!(target: LOG_TARGET, "Loaded configuration for project '{}' from '{path}'", config.project.name);
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Build the project described by this configuration. A relative history path is resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a subject or metric source cannot be constructed
    pub fn into_project(self, base_dir: &Utf8Path) -> Result<Project> {
        let mut sources = MetricSources::new();
        for source in &self.metric_sources {
            sources.add(source.build())?;
        }

        let project_subject = self.project.build(SubjectKind::Project)?;
        let mut project = Project::new(self.organization, project_subject, sources);

        if let Some(history) = &self.history {
            let path = if history.is_absolute() { history.clone() } else { base_dir.join(history) };
            project = project.with_history(FileHistory::load(path, self.recent_history));
        }

        for product in &self.products {
            project.add_product(product.build(product.kind.unwrap_or(SubjectKind::Component))?)?;
        }

        for team in &self.teams {
            project.add_team(team.build(SubjectKind::Team)?)?;
        }

        for document in &self.documents {
            project.add_document(document.build(SubjectKind::Document)?)?;
        }

        Ok(project)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if names are missing or duplicated, if URLs are malformed, or if subjects
    /// refer to metric sources that are not defined
    fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(app_err!("organization must not be empty"));
        }

        if self.recent_history == 0 {
            return Err(app_err!("recent_history must be at least 1"));
        }

        let mut source_names = BTreeSet::new();
        for source in &self.metric_sources {
            source.validate()?;
            if !source_names.insert(source.name.as_str()) {
                return Err(app_err!("metric source '{}' is defined more than once", source.name));
            }
        }

        if let Some(kind) = self.project.kind
            && kind != SubjectKind::Project
        {
            return Err(app_err!("the project cannot be declared as a {kind}"));
        }
        self.project.validate(&source_names)?;

        for product in &self.products {
            if let Some(kind) = product.kind
                && !matches!(kind, SubjectKind::Component | SubjectKind::Application)
            {
                return Err(app_err!("product '{}' must be a component or an application, not a {kind}", product.name));
            }
            product.validate_short_name()?;
            product.validate(&source_names)?;
        }

        for (subjects, kind) in [(&self.teams, SubjectKind::Team), (&self.documents, SubjectKind::Document)] {
            for subject in subjects {
                if subject.kind.is_some_and(|declared| declared != kind) {
                    return Err(app_err!("{kind} '{}' cannot be declared with a different kind", subject.name));
                }
                if kind == SubjectKind::Team {
                    subject.validate_short_name()?;
                }
                subject.validate(&source_names)?;
            }
        }

        Ok(())
    }
}

impl SubjectConfig {
    fn validate_short_name(&self) -> Result<()> {
        if self.short_name.trim().is_empty() {
            return Err(app_err!("'{}' needs a short_name to number its metrics", self.name));
        }
        Ok(())
    }

    fn validate(&self, source_names: &BTreeSet<&str>) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(app_err!("every subject needs a name"));
        }

        if let Some(url) = &self.url {
            let _ = url::Url::parse(url).into_app_err_with(|| format!("invalid URL '{url}' for '{}'", self.name))?;
        }

        for source_name in self.metric_source_ids.keys() {
            if !source_names.contains(source_name.as_str()) {
                return Err(app_err!(
                    "'{}' has ids for metric source '{source_name}', which is not defined",
                    self.name
                ));
            }
        }

        for (&kind, options) in &self.metrics {
            options
                .validate(kind)
                .map_err(|e| app_err!("invalid options for {kind} of '{}': {e}", self.name))?;
        }

        Ok(())
    }

    fn build(&self, kind: SubjectKind) -> Result<Subject> {
        let mut measurable = MeasurableObject::new();
        for (source_name, ids) in &self.metric_source_ids {
            measurable = measurable.with_metric_source_ids(source_name, ids);
        }
        for (&metric_kind, options) in &self.metrics {
            measurable = measurable.with_metric_options(metric_kind, options.build()?);
        }

        let subject = Subject::with_requirements(
            kind,
            &self.name,
            &self.short_name,
            &self.requirements,
            &self.removed_requirements,
        )?
        .with_measurable(measurable);

        Ok(match &self.url {
            Some(url) => subject.with_url(url),
            None => subject,
        })
    }
}

impl MetricOptionsConfig {
    fn validate(&self, kind: MetricKind) -> Result<()> {
        let def = MetricDef::for_kind(kind).ok_or_else(|| app_err!("{kind} is not a known metric"))?;
        let target = self.target.unwrap_or(def.target_value);
        let low_target = self.low_target.unwrap_or(def.low_target_value);

        let ordered = match def.direction {
            Direction::LowerIsBetter => target <= low_target,
            Direction::HigherIsBetter => low_target <= target,
        };
        if !ordered {
            return Err(app_err!(
                "target {target} and low_target {low_target} are in the wrong order for a metric whose {}",
                match def.direction {
                    Direction::LowerIsBetter => "value should go down",
                    Direction::HigherIsBetter => "value should go up",
                }
            ));
        }

        if let (Some(old_age), Some(max_old_age)) = (self.old_age, self.max_old_age)
            && old_age > max_old_age
        {
            return Err(app_err!("old_age must not exceed max_old_age"));
        }

        if let Some(debt) = &self.debt {
            let _ = debt.build()?;
        }

        Ok(())
    }

    fn build(&self) -> Result<MetricOptions> {
        Ok(MetricOptions {
            target: self.target,
            low_target: self.low_target,
            debt_target: self.debt.as_ref().map(DebtConfig::build).transpose()?,
            comment: self.comment.clone(),
            old_age: self.old_age.map(to_time_delta).transpose()?,
            max_old_age: self.max_old_age.map(to_time_delta).transpose()?,
        })
    }
}

fn to_time_delta(duration: Duration) -> Result<TimeDelta> {
    TimeDelta::from_std(duration).into_app_err_with(|| format!("duration {duration:?} is too long"))
}

impl DebtConfig {
    fn build(&self) -> Result<TechnicalDebtTarget> {
        match (self.initial_value, self.initial_date, self.end_date) {
            (None, None, None) => Ok(TechnicalDebtTarget::fixed(self.value, &self.explanation)),
            (Some(initial_value), Some(initial_date), Some(end_date)) => {
                TechnicalDebtTarget::dynamic(initial_value, initial_date, self.value, end_date, &self.explanation)
            }
            _ => Err(app_err!(
                "a technical debt target that changes over time needs initial_value, initial_date and end_date"
            )),
        }
    }
}

impl MetricSourceConfig {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(app_err!("every metric source needs a name"));
        }

        let _ = url::Url::parse(&self.url).into_app_err_with(|| format!("invalid URL '{}' for metric source '{}'", self.url, self.name))?;

        if let Some(template) = &self.url_template
            && !template.contains("{id}")
        {
            return Err(app_err!(
                "url_template of metric source '{}' must contain the {{id}} placeholder",
                self.name
            ));
        }

        Ok(())
    }

    fn build(&self) -> MetricSource {
        let mut provider = RecordedProvider::new();
        for (&quantity, &value) in &self.measurements {
            provider = provider.with_value(quantity, value);
        }
        if let Some(date) = self.date {
            provider = provider.with_date(date);
        }

        for (id, recorded) in &self.ids {
            for (&quantity, &value) in &recorded.measurements {
                provider = provider.with_id_value(id, quantity, value);
            }
            if let Some(date) = recorded.date {
                provider = provider.with_id_date(id, date);
            }
        }

        let source = MetricSource::new(&self.name, self.kind, &self.url, provider);
        match &self.url_template {
            Some(template) => source.with_url_template(template),
            None => source,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
