// Plain-language findings printed after a report run.
use crate::types::{ReportTable, Statistic};
use crate::util::format_number;

/// Which metrics the narrative talks about.
#[derive(Debug, Clone)]
pub struct InsightKeys {
    /// Size metric for "largest entity", e.g. GDP.
    pub size_metric: String,
    /// Optional pair of entities compared on `size_metric`.
    pub compare: Option<(String, String)>,
}

/// Entity `a`'s `metric` as a percentage of entity `b`'s. `None` if either
/// is missing or `b` is zero.
pub fn relative_size(table: &ReportTable, metric: &str, a: &str, b: &str) -> Option<f64> {
    let value = |name: &str| {
        table
            .rows()
            .iter()
            .find(|r| r.record.entity_name() == name)
            .and_then(|r| r.record.metric(metric))
    };
    let (va, vb) = (value(a)?, value(b)?);
    if vb == 0.0 {
        return None;
    }
    Some(va / vb * 100.0)
}

fn strength(r: f64) -> &'static str {
    match r.abs() {
        x if x >= 0.7 => "strong",
        x if x >= 0.4 => "moderate",
        _ => "weak",
    }
}

pub fn key_insights(table: &ReportTable, keys: &InsightKeys) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(top) = table.max_record(&keys.size_metric) {
        lines.push(format!(
            "Largest by {}: {} ({})",
            top.metric,
            top.entity_name,
            format_number(top.value, 2)
        ));
    }

    if let Some(top) = table.rows().iter().max_by(|a, b| a.value.total_cmp(&b.value)) {
        lines.push(format!(
            "Highest {}: {} at {} [{}]",
            table.metric_key(),
            top.record.entity_name(),
            top.value,
            top.category.name
        ));
    }

    if let Some((a, b)) = &keys.compare {
        if let Some(pct) = relative_size(table, &keys.size_metric, a, b) {
            lines.push(format!("{} {} is {}% of {}", a, keys.size_metric, format_number(pct, 1), b));
        }
    }

    if let Some(corr) = &table.summary().correlation {
        let text = match corr.pearson {
            Statistic::Defined(r) => format!(
                "{:.2} ({} {} relationship)",
                r,
                strength(r),
                if r >= 0.0 { "positive" } else { "negative" }
            ),
            Statistic::Undefined(reason) => format!("undefined ({})", reason),
        };
        lines.push(format!("Correlation {} vs {}: {}", corr.x, corr.y, text));
    }

    for count in table.category_counts().iter().filter(|c| c.count > 0) {
        lines.push(format!("{}: {} of {}", count.category, count.count, table.len()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{build_table, BuildOptions, Mode};
    use crate::classify::ClassificationRule;
    use crate::datasets::{major_economies_2024, GDP_METRIC, TOTAL_DEBT_METRIC};
    use crate::loader::DEBT_RATIO_METRIC;
    use crate::types::Record;

    #[test]
    fn major_economy_narrative() {
        let opts = BuildOptions::new(Mode::Strict)
            .with_max(GDP_METRIC)
            .with_correlation(GDP_METRIC, TOTAL_DEBT_METRIC);
        let table = build_table(
            &major_economies_2024().unwrap(),
            DEBT_RATIO_METRIC,
            &ClassificationRule::debt_to_gdp(),
            &opts,
        )
        .unwrap();
        let keys = InsightKeys {
            size_metric: GDP_METRIC.into(),
            compare: Some(("OIC (57 members)".into(), "United States".into())),
        };
        let lines = key_insights(&table, &keys);
        assert!(lines[0].contains("United States"));
        assert!(lines[1].contains("Japan") && lines[1].contains("Critical"));
        assert!(lines[2].contains("32.0%"));
        assert!(lines[3].contains("strong positive"));
    }

    #[test]
    fn undefined_correlation_is_spelled_out() {
        let records: Vec<_> = ["A", "B"]
            .iter()
            .map(|n| Record::from_pairs(n, 2024, &[("x", 1.0), (DEBT_RATIO_METRIC, 50.0)]).unwrap())
            .collect();
        let opts = BuildOptions::new(Mode::Strict).with_correlation("x", DEBT_RATIO_METRIC);
        let table = build_table(&records, DEBT_RATIO_METRIC, &ClassificationRule::debt_to_gdp(), &opts).unwrap();
        let keys = InsightKeys { size_metric: "x".into(), compare: None };
        let lines = key_insights(&table, &keys);
        assert!(lines.iter().any(|l| l.ends_with("undefined (zero variance)")));
        assert!(!lines.iter().any(|l| l.contains("0.00")));
    }
}
