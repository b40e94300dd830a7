use super::format::format_date;
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::app_err;

/// The level of technical debt that is currently accepted for a metric.
///
/// A metric that scores below its target but at or better than the accepted technical debt level
/// is reported as grey instead of yellow or red. The accepted level is either fixed, or reduced
/// linearly over a period of time.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalDebtTarget {
    value: f64,
    explanation: String,
    reduction: Option<Reduction>,
}

#[derive(Debug, Clone, PartialEq)]
struct Reduction {
    initial_value: f64,
    initial_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl TechnicalDebtTarget {
    /// Create a technical debt target with a fixed accepted level.
    #[must_use]
    pub fn fixed(value: f64, explanation: impl Into<String>) -> Self {
        Self {
            value,
            explanation: explanation.into(),
            reduction: None,
        }
    }

    /// Create a technical debt target that moves from `initial_value` at `initial_date` to
    /// `end_value` at `end_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end_date` is not after `initial_date` or if either value is not a finite number.
    pub fn dynamic(
        initial_value: f64,
        initial_date: DateTime<Utc>,
        end_value: f64,
        end_date: DateTime<Utc>,
        explanation: impl Into<String>,
    ) -> Result<Self> {
        if end_date <= initial_date {
            return Err(app_err!(
                "technical debt end date ({end_date}) must be after its initial date ({initial_date})"
            ));
        }

        if !initial_value.is_finite() || !end_value.is_finite() {
            return Err(app_err!(
                "technical debt values must be numbers, got {initial_value} and {end_value}"
            ));
        }

        Ok(Self {
            value: end_value,
            explanation: explanation.into(),
            reduction: Some(Reduction {
                initial_value,
                initial_date,
                end_date,
            }),
        })
    }

    /// Return the currently accepted technical debt level, evaluated against the wall clock.
    #[must_use]
    pub fn target_value(&self) -> f64 {
        self.target_value_at(Utc::now())
    }

    /// Return the technical debt level accepted at `now`.
    #[must_use]
    pub fn target_value_at(&self, now: DateTime<Utc>) -> f64 {
        let Some(reduction) = &self.reduction else {
            return self.value;
        };

        if now < reduction.initial_date {
            return reduction.initial_value;
        }

        if now >= reduction.end_date {
            return self.value;
        }

        #[expect(clippy::cast_precision_loss, reason = "periods are far shorter than 2^52 milliseconds")]
        let fraction = (now - reduction.initial_date).num_milliseconds() as f64
            / (reduction.end_date - reduction.initial_date).num_milliseconds() as f64;

        fraction
            .mul_add(self.value - reduction.initial_value, reduction.initial_value)
            .round_ties_even()
    }

    /// Return whether the accepted level changes over time.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.reduction.is_some()
    }

    /// Explain the accepted technical debt, rendering values with `unit`.
    #[must_use]
    pub fn explanation(&self, unit: &str) -> String {
        self.explanation_at(unit, Utc::now())
    }

    /// Explain the technical debt accepted at `now`, rendering values with `unit`.
    #[must_use]
    pub fn explanation_at(&self, unit: &str, now: DateTime<Utc>) -> String {
        let unit = space_unit(unit);
        let mut explanation = String::new();

        if let Some(reduction) = &self.reduction {
            explanation.push_str(&format!(
                "The goal is to reduce the technical debt from {}{unit} on {} to {}{unit} on {}. ",
                reduction.initial_value,
                format_date(Some(reduction.initial_date), true),
                self.value,
                format_date(Some(reduction.end_date), true),
            ));
        }

        explanation.push_str(&format!(
            "The currently accepted technical debt is {}{unit}.",
            self.target_value_at(now)
        ));

        if !self.explanation.is_empty() {
            explanation.push(' ');
            explanation.push_str(&self.explanation);
        }

        explanation
    }
}

/// Add a space before the unit unless the unit is a percentage sign, empty, or already spaced.
fn space_unit(unit: &str) -> String {
    if unit.is_empty() || unit == "%" || unit.starts_with(' ') {
        unit.to_string()
    } else {
        format!(" {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_fixed_target_value() {
        let target = TechnicalDebtTarget::fixed(100.0, "");
        assert!((target.target_value() - 100.0).abs() < f64::EPSILON);
        assert!(!target.is_dynamic());
    }

    #[test]
    fn test_fixed_explanation_without_unit() {
        let target = TechnicalDebtTarget::fixed(100.0, "");
        assert_eq!(target.explanation(""), "The currently accepted technical debt is 100.");
    }

    #[test]
    fn test_fixed_explanation_with_extra_text() {
        let target = TechnicalDebtTarget::fixed(100.0, "Legacy code.");
        assert_eq!(
            target.explanation("LOC"),
            "The currently accepted technical debt is 100 LOC. Legacy code."
        );
    }

    #[test]
    fn test_percentage_unit_is_not_spaced() {
        let target = TechnicalDebtTarget::fixed(10.0, "");
        assert_eq!(target.explanation("%"), "The currently accepted technical debt is 10%.");
    }

    #[test]
    fn test_spaced_unit_is_not_spaced_twice() {
        let target = TechnicalDebtTarget::fixed(10.0, "");
        assert_eq!(target.explanation(" bugs"), "The currently accepted technical debt is 10 bugs.");
    }

    #[test]
    fn test_dynamic_target_at_start() {
        let target = TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0() + TimeDelta::days(10), "").unwrap();
        assert!((target.target_value_at(t0()) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_target_at_end() {
        let target = TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0() + TimeDelta::days(10), "").unwrap();
        assert!((target.target_value_at(t0() + TimeDelta::days(10)) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_target_halfway() {
        let target = TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0() + TimeDelta::days(10), "").unwrap();
        assert!((target.target_value_at(t0() + TimeDelta::days(5)) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_target_before_and_after_period() {
        let target = TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0() + TimeDelta::days(10), "").unwrap();
        assert!((target.target_value_at(t0() - TimeDelta::days(1)) - 100.0).abs() < f64::EPSILON);
        assert!((target.target_value_at(t0() + TimeDelta::days(100)) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_target_decreasing_is_rounded() {
        let target = TechnicalDebtTarget::dynamic(10.0, t0(), 0.0, t0() + TimeDelta::days(3), "").unwrap();
        assert!((target.target_value_at(t0() + TimeDelta::days(1)) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_target_end_before_start_fails() {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let result = TechnicalDebtTarget::dynamic(100.0, start, 200.0, end, "");
        assert!(result.unwrap_err().to_string().contains("must be after"));
    }

    #[test]
    fn test_dynamic_target_empty_period_fails() {
        let _ = TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0(), "").unwrap_err();
    }

    #[test]
    fn test_dynamic_target_non_numeric_fails() {
        let _ = TechnicalDebtTarget::dynamic(f64::NAN, t0(), 200.0, t0() + TimeDelta::days(1), "").unwrap_err();
    }

    #[test]
    fn test_dynamic_explanation() {
        let target =
            TechnicalDebtTarget::dynamic(100.0, t0(), 200.0, t0() + TimeDelta::days(10), "Migration.").unwrap();
        assert_eq!(
            target.explanation_at("LOC", t0() + TimeDelta::days(5)),
            "The goal is to reduce the technical debt from 100 LOC on 1 Jan 2024 to 200 LOC on 11 Jan 2024. \
             The currently accepted technical debt is 150 LOC. Migration."
        );
    }
}
