use crate::classify::Category;
use crate::error::{ReportError, Result, UndefinedReason};
use serde::Serialize;
use std::collections::HashSet;

/// One entity-period observation, e.g. a country's figures for one year.
///
/// Metric order is preserved as given; it drives report column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity_name: String,
    period: i32,
    metrics: Vec<(String, f64)>,
}

impl Record {
    /// Build a record, rejecting an empty entity name or a repeated metric key.
    pub fn new(entity_name: impl Into<String>, period: i32, metrics: Vec<(String, f64)>) -> Result<Self> {
        let entity_name = entity_name.into().trim().to_string();
        if entity_name.is_empty() {
            return Err(ReportError::InvalidRecord("entity name is empty".into()));
        }
        let mut seen = HashSet::new();
        for (key, _) in &metrics {
            if !seen.insert(key.as_str()) {
                return Err(ReportError::InvalidRecord(format!(
                    "metric '{}' appears twice for '{}'",
                    key, entity_name
                )));
            }
        }
        Ok(Self { entity_name, period, metrics })
    }

    pub fn from_pairs(entity_name: &str, period: i32, pairs: &[(&str, f64)]) -> Result<Self> {
        let metrics = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Self::new(entity_name, period, metrics)
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn period(&self) -> i32 {
        self.period
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn metrics(&self) -> &[(String, f64)] {
        &self.metrics
    }
}

/// A record with the category assigned from its classified metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record: Record,
    pub value: f64,
    pub category: Category,
}

/// A cross-record statistic that is either a number or an explicit
/// "undefined" marker. Never collapsed to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Statistic<T> {
    Defined(T),
    Undefined(UndefinedReason),
}

impl<T: Copy> Statistic<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Statistic::Defined(v) => Some(*v),
            Statistic::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Statistic::Defined(_))
    }
}

/// Record holding the largest value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxRecord {
    pub metric: String,
    pub entity_name: String,
    pub period: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub x: String,
    pub y: String,
    pub pearson: Statistic<f64>,
}

/// Descriptive statistics for one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStats {
    pub metric: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined below two values.
    pub std: Statistic<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSummary {
    pub max_records: Vec<(String, Statistic<MaxRef>)>,
    pub correlation: Option<Correlation>,
    pub metric_stats: Vec<MetricStats>,
}

/// Index of the max record within `ReportTable::rows`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaxRef {
    pub row: usize,
    pub value: f64,
}

/// Classified rows plus summary scalars for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    rows: Vec<ClassifiedRecord>,
    metric_key: String,
    categories: Vec<Category>,
    skipped: Vec<String>,
    summary: TableSummary,
}

impl ReportTable {
    pub(crate) fn new(
        rows: Vec<ClassifiedRecord>,
        metric_key: String,
        categories: Vec<Category>,
        skipped: Vec<String>,
        summary: TableSummary,
    ) -> Self {
        Self { rows, metric_key, categories, skipped, summary }
    }

    pub fn rows(&self) -> &[ClassifiedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Name of the metric the categories were derived from.
    pub fn metric_key(&self) -> &str {
        &self.metric_key
    }

    /// Entities dropped in lenient mode for lacking the classified metric.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn summary(&self) -> &TableSummary {
        &self.summary
    }

    /// Every metric name seen across the rows, in first-seen order.
    pub fn metric_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut cols = Vec::new();
        for row in &self.rows {
            for (key, _) in row.record.metrics() {
                if seen.insert(key.as_str()) {
                    cols.push(key.as_str());
                }
            }
        }
        cols
    }

    /// Largest record for `metric`, if it was requested and defined.
    pub fn max_record(&self, metric: &str) -> Option<MaxRecord> {
        let (_, stat) = self.summary.max_records.iter().find(|(m, _)| m == metric)?;
        let max = stat.value()?;
        let row = self.rows.get(max.row)?;
        Some(MaxRecord {
            metric: metric.to_string(),
            entity_name: row.record.entity_name().to_string(),
            period: row.record.period(),
            value: max.value,
        })
    }

    /// Row count per category, in rule order, zero-count buckets included.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        self.categories
            .iter()
            .map(|cat| CategoryCount {
                category: cat.name.clone(),
                color: cat.color.clone(),
                count: self.rows.iter().filter(|r| r.category.name == cat.name).count(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub color: String,
    pub count: usize,
}

/// JSON summary written next to the CSV report.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub metric_key: String,
    pub total_rows: usize,
    pub skipped_count: usize,
    pub skipped_entities: Vec<String>,
    pub categories: Vec<CategoryCount>,
    pub max_records: Vec<MaxRecord>,
    pub correlation: Option<Correlation>,
    pub metric_stats: Vec<MetricStats>,
}
