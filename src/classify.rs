//! Threshold classification of a single metric value into named bands.
//!
//! Bands are listed highest threshold first. A value belongs to a band when
//! it is strictly above that band's threshold, except for the lowest listed
//! band which also includes its threshold. Anything below the lowest
//! threshold falls into the rule's default category.

use crate::error::{ReportError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    /// Display color as a hex string, e.g. `#d32f2f`.
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self { name: name.into(), color: color.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub threshold: f64,
    pub category: Category,
}

impl Band {
    pub fn new(threshold: f64, name: &str, color: &str) -> Self {
        Self { threshold, category: Category::new(name, color) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRule {
    bands: Vec<Band>,
    default: Category,
}

impl ClassificationRule {
    /// Validate and build a rule. Thresholds must be finite and strictly
    /// decreasing; at least one band is required.
    pub fn new(bands: Vec<Band>, default: Category) -> Result<Self> {
        if bands.is_empty() {
            return Err(ReportError::InvalidRule("at least one band is required".into()));
        }
        for band in &bands {
            if !band.threshold.is_finite() {
                return Err(ReportError::InvalidRule(format!(
                    "threshold for '{}' is not finite",
                    band.category.name
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].threshold >= pair[0].threshold {
                return Err(ReportError::InvalidRule(format!(
                    "thresholds must strictly decrease: {} then {}",
                    pair[0].threshold, pair[1].threshold
                )));
            }
        }
        Ok(Self { bands, default })
    }

    /// Debt-to-GDP risk bands used across the analysis scripts.
    pub fn debt_to_gdp() -> Self {
        Self {
            bands: vec![
                Band::new(200.0, "Critical", "#8b0000"),
                Band::new(90.0, "High (>90%)", "#d32f2f"),
                Band::new(60.0, "High (60-90%)", "#f57c00"),
                Band::new(30.0, "Moderate (30-60%)", "#388e3c"),
            ],
            default: Category::new("Low (<30%)", "#2ecc71"),
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn default_category(&self) -> &Category {
        &self.default
    }

    /// All categories, highest band first and the default last.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.bands.iter().map(|b| &b.category).chain(std::iter::once(&self.default))
    }
}

/// Assign `value` to exactly one category of `rule`.
pub fn classify(value: f64, rule: &ClassificationRule) -> Result<&Category> {
    if !value.is_finite() {
        return Err(ReportError::InvalidMetric {
            entity: None,
            metric: String::new(),
            value,
        });
    }
    let last = rule.bands.len() - 1;
    for (i, band) in rule.bands.iter().enumerate() {
        let inside = if i == last {
            value >= band.threshold
        } else {
            value > band.threshold
        };
        if inside {
            return Ok(&band.category);
        }
    }
    Ok(&rule.default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(v: f64) -> String {
        classify(v, &ClassificationRule::debt_to_gdp()).unwrap().name.clone()
    }

    #[test]
    fn boundaries_fall_into_the_lower_band() {
        assert_eq!(name(60.0), "Moderate (30-60%)");
        assert_eq!(name(60.0001), "High (60-90%)");
        assert_eq!(name(90.0), "High (60-90%)");
        assert_eq!(name(200.0), "High (>90%)");
        assert_eq!(name(200.0001), "Critical");
    }

    #[test]
    fn lowest_threshold_is_inclusive() {
        assert_eq!(name(30.0), "Moderate (30-60%)");
        assert_eq!(name(29.9), "Low (<30%)");
        assert_eq!(name(-5.0), "Low (<30%)");
    }

    #[test]
    fn colors_follow_category() {
        let rule = ClassificationRule::debt_to_gdp();
        assert_eq!(classify(255.0, &rule).unwrap().color, "#8b0000");
        assert_eq!(classify(10.0, &rule).unwrap().color, "#2ecc71");
    }

    #[test]
    fn non_finite_is_invalid_metric() {
        let rule = ClassificationRule::debt_to_gdp();
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(classify(v, &rule), Err(ReportError::InvalidMetric { .. })));
        }
    }

    #[test]
    fn rule_validation() {
        let low = Category::new("Low", "#000");
        assert!(ClassificationRule::new(vec![], low.clone()).is_err());
        assert!(ClassificationRule::new(
            vec![Band::new(10.0, "a", "#1"), Band::new(10.0, "b", "#2")],
            low.clone()
        )
        .is_err());
        assert!(ClassificationRule::new(vec![Band::new(f64::NAN, "a", "#1")], low.clone()).is_err());
        let rule = ClassificationRule::new(vec![Band::new(5.0, "a", "#1")], low).unwrap();
        assert_eq!(classify(5.0, &rule).unwrap().name, "a");
        assert_eq!(classify(4.9, &rule).unwrap().name, "Low");
    }

    #[test]
    fn categories_list_default_last() {
        let rule = ClassificationRule::debt_to_gdp();
        let names: Vec<_> = rule.categories().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "Critical");
        assert_eq!(names[4], "Low (<30%)");
    }
}
