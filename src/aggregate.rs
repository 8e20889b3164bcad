use crate::classify::{classify, ClassificationRule};
use crate::error::{ReportError, Result, UndefinedReason};
use crate::types::{
    ClassifiedRecord, Correlation, MaxRef, MetricStats, Record, ReportTable, Statistic,
    TableSummary,
};
use crate::util::{average, sample_std};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How records lacking the classified metric are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// First missing metric aborts the build.
    Strict,
    /// Missing records are skipped and listed in the table.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Entity,
    Period,
    Category,
    Metric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub mode: Mode,
    pub sort: Option<SortSpec>,
    pub max_metrics: Vec<String>,
    pub correlation: Option<(String, String)>,
    pub describe: bool,
}

impl BuildOptions {
    pub fn new(mode: Mode) -> Self {
        Self { mode, sort: None, max_metrics: Vec::new(), correlation: None, describe: false }
    }

    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(SortSpec { key, order });
        self
    }

    pub fn with_max(mut self, metric: impl Into<String>) -> Self {
        self.max_metrics.push(metric.into());
        self
    }

    pub fn with_correlation(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.correlation = Some((x.into(), y.into()));
        self
    }

    pub fn with_describe(mut self) -> Self {
        self.describe = true;
        self
    }
}

/// Classify every record by `metric_key` and compute the requested summary.
///
/// Input order is preserved unless `options.sort` is set; sorting is stable.
pub fn build_table(
    records: &[Record],
    metric_key: &str,
    rules: &ClassificationRule,
    options: &BuildOptions,
) -> Result<ReportTable> {
    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        let value = match record.metric(metric_key) {
            Some(v) => v,
            None => match options.mode {
                Mode::Strict => {
                    return Err(ReportError::MissingMetric {
                        entity: record.entity_name().to_string(),
                        metric: metric_key.to_string(),
                    })
                }
                Mode::Lenient => {
                    log::warn!(
                        "Skipping '{}' ({}): no value for '{}'",
                        record.entity_name(),
                        record.period(),
                        metric_key
                    );
                    skipped.push(record.entity_name().to_string());
                    continue;
                }
            },
        };
        let category = classify(value, rules).map_err(|_| ReportError::InvalidMetric {
            entity: Some(record.entity_name().to_string()),
            metric: metric_key.to_string(),
            value,
        })?;
        rows.push(ClassifiedRecord { record: record.clone(), value, category: category.clone() });
    }

    if let Some(spec) = &options.sort {
        sort_rows(&mut rows, spec, rules);
    }

    let summary = summarize_rows(&rows, options);
    log::debug!(
        "Built table for '{}': {} rows, {} skipped",
        metric_key,
        rows.len(),
        skipped.len()
    );
    Ok(ReportTable::new(
        rows,
        metric_key.to_string(),
        rules.categories().cloned().collect(),
        skipped,
        summary,
    ))
}

fn sort_rows(rows: &mut [ClassifiedRecord], spec: &SortSpec, rules: &ClassificationRule) {
    let directed = |ord: Ordering| match spec.order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    };
    match &spec.key {
        SortKey::Entity => {
            rows.sort_by(|a, b| directed(a.record.entity_name().cmp(b.record.entity_name())))
        }
        SortKey::Period => rows.sort_by(|a, b| directed(a.record.period().cmp(&b.record.period()))),
        SortKey::Category => {
            // Rule order: highest band first.
            let rank = |r: &ClassifiedRecord| {
                rules.categories().position(|c| c.name == r.category.name).unwrap_or(usize::MAX)
            };
            rows.sort_by(|a, b| directed(rank(a).cmp(&rank(b))))
        }
        SortKey::Metric(name) => rows.sort_by(|a, b| {
            match (a.record.metric(name), b.record.metric(name)) {
                (Some(x), Some(y)) => directed(x.total_cmp(&y)),
                // Missing values go last whatever the direction.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

fn summarize_rows(rows: &[ClassifiedRecord], options: &BuildOptions) -> TableSummary {
    let max_records = options
        .max_metrics
        .iter()
        .map(|m| (m.clone(), arg_max(rows, m)))
        .collect();

    let correlation = options.correlation.as_ref().map(|(x, y)| {
        let (xs, ys): (Vec<f64>, Vec<f64>) = rows
            .iter()
            .filter_map(|r| Some((r.record.metric(x)?, r.record.metric(y)?)))
            .unzip();
        let pearson = match pearson(&xs, &ys) {
            Ok(v) => Statistic::Defined(v),
            Err(ReportError::UndefinedStatistic { reason, .. }) => Statistic::Undefined(reason),
            Err(_) => Statistic::Undefined(UndefinedReason::NonFinite),
        };
        Correlation { x: x.clone(), y: y.clone(), pearson }
    });

    let metric_stats = if options.describe { describe(rows) } else { Vec::new() };

    TableSummary { max_records, correlation, metric_stats }
}

/// First row holding the largest finite value of `metric`; ties keep the earliest.
fn arg_max(rows: &[ClassifiedRecord], metric: &str) -> Statistic<MaxRef> {
    let mut best: Option<MaxRef> = None;
    for (row, r) in rows.iter().enumerate() {
        let Some(value) = r.record.metric(metric) else { continue };
        if !value.is_finite() {
            continue;
        }
        if best.map_or(true, |b| value > b.value) {
            best = Some(MaxRef { row, value });
        }
    }
    match best {
        Some(b) => Statistic::Defined(b),
        None => Statistic::Undefined(UndefinedReason::NoValues),
    }
}

/// Pearson correlation coefficient of two equally long series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let undefined = |reason| ReportError::UndefinedStatistic { statistic: "pearson".into(), reason };
    if xs.len() != ys.len() {
        return Err(ReportError::MalformedSource(format!(
            "series lengths differ: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(undefined(UndefinedReason::TooFewRecords));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(undefined(UndefinedReason::NonFinite));
    }
    // Decided on the raw values: a mean of e.g. [0.1; 3] carries rounding error.
    if xs.iter().all(|v| *v == xs[0]) || ys.iter().all(|v| *v == ys[0]) {
        return Err(undefined(UndefinedReason::ZeroVariance));
    }
    // Correlation is scale invariant; scaling to [-1, 1] keeps the squares finite.
    let scaled = |v: &[f64]| -> Vec<f64> {
        let max = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        v.iter().map(|x| x / max).collect()
    };
    let (xs, ys) = (scaled(xs), scaled(ys));
    let mean_x = average(&xs);
    let mean_y = average(&ys);
    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in xs.iter().zip(&ys) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    if !(num.is_finite() && den_x.is_finite() && den_y.is_finite()) {
        return Err(undefined(UndefinedReason::NonFinite));
    }
    if den_x == 0.0 || den_y == 0.0 {
        return Err(undefined(UndefinedReason::ZeroVariance));
    }
    Ok((num / (den_x * den_y).sqrt()).clamp(-1.0, 1.0))
}

fn describe(rows: &[ClassifiedRecord]) -> Vec<MetricStats> {
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for r in rows {
        for (key, value) in r.record.metrics() {
            if !value.is_finite() {
                continue;
            }
            match columns.iter_mut().find(|(k, _)| k == key) {
                Some((_, vals)) => vals.push(*value),
                None => columns.push((key.clone(), vec![*value])),
            }
        }
    }
    columns
        .into_iter()
        .map(|(metric, vals)| MetricStats {
            count: vals.len(),
            mean: average(&vals),
            std: match sample_std(&vals) {
                Some(s) => Statistic::Defined(s),
                None => Statistic::Undefined(UndefinedReason::TooFewRecords),
            },
            min: vals.iter().copied().fold(f64::INFINITY, f64::min),
            max: vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            metric,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATIO: &str = "Debt-to-GDP Ratio (%)";

    fn rec(name: &str, gdp: f64, ratio: f64) -> Record {
        Record::from_pairs(name, 2024, &[("GDP", gdp), (RATIO, ratio)]).unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("United States", 28780.0, 123.0),
            rec("Japan", 4200.0, 260.0),
            rec("Germany", 4590.0, 63.0),
            rec("OIC", 9200.0, 38.0),
        ]
    }

    #[test]
    fn classifies_each_record_in_input_order() {
        let rules = ClassificationRule::debt_to_gdp();
        let table = build_table(&sample(), RATIO, &rules, &BuildOptions::new(Mode::Strict)).unwrap();
        let cats: Vec<_> = table.rows().iter().map(|r| r.category.name.as_str()).collect();
        assert_eq!(cats, ["High (>90%)", "Critical", "High (60-90%)", "Moderate (30-60%)"]);
        assert_eq!(table.skipped_count(), 0);
    }

    #[test]
    fn strict_mode_fails_on_missing_metric() {
        let mut records = sample();
        records.push(Record::from_pairs("Brazil", 2024, &[("GDP", 2260.0)]).unwrap());
        let err = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &BuildOptions::new(Mode::Strict))
            .unwrap_err();
        match err {
            ReportError::MissingMetric { entity, .. } => assert_eq!(entity, "Brazil"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lenient_mode_skips_and_reports() {
        let mut records = sample();
        records.insert(1, Record::from_pairs("Brazil", 2024, &[("GDP", 2260.0)]).unwrap());
        let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &BuildOptions::new(Mode::Lenient))
            .unwrap();
        assert_eq!(table.len(), records.len() - 1);
        assert_eq!(table.skipped(), ["Brazil".to_string()]);
    }

    #[test]
    fn nan_metric_fails_even_when_lenient() {
        let records = vec![rec("Nowhere", 1.0, f64::NAN)];
        let err = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &BuildOptions::new(Mode::Lenient))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidMetric { entity: Some(_), .. }));
    }

    #[test]
    fn sort_by_metric_is_stable() {
        let records = vec![rec("A", 1.0, 50.0), rec("B", 2.0, 70.0), rec("C", 3.0, 50.0), rec("D", 4.0, 70.0)];
        let opts = BuildOptions::new(Mode::Strict).with_sort(SortKey::Metric(RATIO.into()), SortOrder::Descending);
        let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let names: Vec<_> = table.rows().iter().map(|r| r.record.entity_name()).collect();
        assert_eq!(names, ["B", "D", "A", "C"]);

        let opts = BuildOptions::new(Mode::Strict).with_sort(SortKey::Metric(RATIO.into()), SortOrder::Ascending);
        let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let names: Vec<_> = table.rows().iter().map(|r| r.record.entity_name()).collect();
        assert_eq!(names, ["A", "C", "B", "D"]);
    }

    #[test]
    fn sort_puts_missing_metric_last() {
        let records = vec![
            Record::from_pairs("NoGdp", 2024, &[(RATIO, 10.0)]).unwrap(),
            rec("Small", 1.0, 10.0),
            rec("Big", 9.0, 10.0),
        ];
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let opts = BuildOptions::new(Mode::Strict).with_sort(SortKey::Metric("GDP".into()), order);
            let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
            assert_eq!(table.rows()[2].record.entity_name(), "NoGdp");
        }
    }

    #[test]
    fn sort_by_category_uses_rule_order() {
        let opts = BuildOptions::new(Mode::Strict).with_sort(SortKey::Category, SortOrder::Ascending);
        let table = build_table(&sample(), RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        assert_eq!(table.rows()[0].record.entity_name(), "Japan");
        assert_eq!(table.rows()[3].record.entity_name(), "OIC");
    }

    #[test]
    fn max_record_per_metric() {
        let opts = BuildOptions::new(Mode::Strict).with_max("GDP").with_max(RATIO).with_max("Unknown");
        let table = build_table(&sample(), RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        assert_eq!(table.max_record("GDP").unwrap().entity_name, "United States");
        assert_eq!(table.max_record(RATIO).unwrap().entity_name, "Japan");
        assert!(table.max_record("Unknown").is_none());
        let (_, stat) = &table.summary().max_records[2];
        assert_eq!(*stat, Statistic::Undefined(UndefinedReason::NoValues));
    }

    #[test]
    fn pearson_linear_and_inverse() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        let down: Vec<f64> = xs.iter().map(|x| -2.0 * x + 7.0).collect();
        assert!((pearson(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_undefined_cases() {
        let reason = |r: Result<f64>| match r {
            Err(ReportError::UndefinedStatistic { reason, .. }) => reason,
            other => panic!("expected undefined, got {other:?}"),
        };
        assert_eq!(reason(pearson(&[1.0], &[2.0])), UndefinedReason::TooFewRecords);
        assert_eq!(reason(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0])), UndefinedReason::ZeroVariance);
        assert_eq!(reason(pearson(&[1.0, f64::NAN], &[1.0, 2.0])), UndefinedReason::NonFinite);
    }

    #[test]
    fn pearson_constant_series_with_inexact_values() {
        for c in [0.1, 0.7, 38.8, 1.1] {
            let constant = [c; 3];
            match pearson(&constant, &[1.0, 2.0, 3.0]) {
                Err(ReportError::UndefinedStatistic { reason, .. }) => assert_eq!(reason, UndefinedReason::ZeroVariance),
                other => panic!("constant {c}: expected zero variance, got {other:?}"),
            }
            assert!(pearson(&[1.0, 2.0, 3.0], &constant).is_err());
        }
    }

    #[test]
    fn pearson_handles_huge_values() {
        let r = pearson(&[1e200, -1e200], &[1e200, -1e200]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[f64::MAX, -f64::MAX, 0.0], &[1.0, 3.0, 2.0]).unwrap();
        assert!(r.is_finite());
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn inexact_constant_ratio_gives_sentinel_in_summary() {
        let records = vec![rec("A", 1.0, 0.1), rec("B", 2.0, 0.1), rec("C", 3.0, 0.1)];
        let opts = BuildOptions::new(Mode::Strict).with_correlation("GDP", RATIO);
        let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let corr = table.summary().correlation.as_ref().unwrap();
        assert_eq!(corr.pearson, Statistic::Undefined(UndefinedReason::ZeroVariance));
    }

    #[test]
    fn correlation_sentinel_in_summary() {
        let records = vec![rec("A", 5.0, 10.0), rec("B", 5.0, 20.0), rec("C", 5.0, 30.0)];
        let opts = BuildOptions::new(Mode::Strict).with_correlation("GDP", RATIO);
        let table = build_table(&records, RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let corr = table.summary().correlation.as_ref().unwrap();
        assert_eq!(corr.pearson, Statistic::Undefined(UndefinedReason::ZeroVariance));
        assert_eq!(corr.pearson.value(), None);
    }

    #[test]
    fn describe_covers_every_metric() {
        let opts = BuildOptions::new(Mode::Strict).with_describe();
        let table = build_table(&sample(), RATIO, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let stats = &table.summary().metric_stats;
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].metric, "GDP");
        assert_eq!(stats[0].count, 4);
        assert_eq!(stats[1].max, 260.0);
        assert_eq!(stats[1].min, 38.0);
        assert!(stats[1].std.is_defined());
    }

    #[test]
    fn category_counts_include_empty_buckets() {
        let table =
            build_table(&sample(), RATIO, &ClassificationRule::debt_to_gdp(), &BuildOptions::new(Mode::Strict)).unwrap();
        let counts = table.category_counts();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 4);
        assert_eq!(counts[4].category, "Low (<30%)");
        assert_eq!(counts[4].count, 0);
    }
}
