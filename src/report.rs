use crate::error::Result;
use crate::types::{ReportSummary, ReportTable};
use crate::util::format_number;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

pub const ENTITY_FIELD: &str = "Entity";
pub const PERIOD_FIELD: &str = "Period";
pub const CATEGORY_FIELD: &str = "Category";
pub const COLOR_FIELD: &str = "Color";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    /// The record has no value for this metric column.
    Empty,
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Empty => serializer.serialize_none(),
        }
    }
}

/// One flat output row: field names and values in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub fields: Vec<(String, FieldValue)>,
}

impl ReportRow {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Numeric rendering for delimited output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Shortest text that parses back to the same value.
    Shortest,
    /// Fixed decimals. The classified column keeps full precision whenever
    /// rounding would change its value.
    Fixed(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkFormat {
    Delimited { delimiter: u8, header: bool, precision: Precision },
    /// Array of objects, one per row, for charting backends.
    Json,
}

impl SinkFormat {
    pub fn csv() -> Self {
        SinkFormat::Delimited { delimiter: b',', header: true, precision: Precision::Shortest }
    }
}

/// Flatten the table into rows with a fixed field order:
/// entity, period, every metric column, category, color.
pub fn to_rows(table: &ReportTable) -> Vec<ReportRow> {
    let columns = table.metric_columns();
    table
        .rows()
        .iter()
        .map(|row| {
            let mut fields = Vec::with_capacity(columns.len() + 4);
            fields.push((ENTITY_FIELD.to_string(), FieldValue::Text(row.record.entity_name().to_string())));
            fields.push((PERIOD_FIELD.to_string(), FieldValue::Integer(row.record.period() as i64)));
            for col in &columns {
                let value = match row.record.metric(col) {
                    Some(v) => FieldValue::Number(v),
                    None => FieldValue::Empty,
                };
                fields.push((col.to_string(), value));
            }
            fields.push((CATEGORY_FIELD.to_string(), FieldValue::Text(row.category.name.clone())));
            fields.push((COLOR_FIELD.to_string(), FieldValue::Text(row.category.color.clone())));
            ReportRow { fields }
        })
        .collect()
}

/// Header names in output order. Present even for an empty table.
pub fn field_names(table: &ReportTable) -> Vec<String> {
    let mut names = vec![ENTITY_FIELD.to_string(), PERIOD_FIELD.to_string()];
    names.extend(table.metric_columns().into_iter().map(str::to_string));
    names.push(CATEGORY_FIELD.to_string());
    names.push(COLOR_FIELD.to_string());
    names
}

fn render_number(v: f64, precision: Precision, exact: bool) -> String {
    match precision {
        Precision::Shortest => v.to_string(),
        Precision::Fixed(d) => {
            let s = format!("{:.*}", d, v);
            if exact && s.parse::<f64>().ok() != Some(v) {
                v.to_string()
            } else {
                s
            }
        }
    }
}

fn render_field(value: &FieldValue, precision: Precision, exact: bool) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Number(n) => render_number(*n, precision, exact),
        FieldValue::Empty => String::new(),
    }
}

/// Write the table to `sink` and return the number of data rows written.
/// The table is not modified.
pub fn to_external<W: Write>(table: &ReportTable, mut sink: W, format: &SinkFormat) -> Result<usize> {
    let rows = to_rows(table);
    match format {
        SinkFormat::Delimited { delimiter, header, precision } => {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(*delimiter)
                .has_headers(false)
                .from_writer(sink);
            if *header {
                wtr.write_record(field_names(table))?;
            }
            for row in &rows {
                wtr.write_record(row.fields.iter().map(|(name, value)| {
                    render_field(value, *precision, name == table.metric_key())
                }))?;
            }
            wtr.flush()?;
        }
        SinkFormat::Json => {
            serde_json::to_writer_pretty(&mut sink, &rows)?;
            sink.flush()?;
        }
    }
    Ok(rows.len())
}

pub fn write_table<P: AsRef<Path>>(path: P, table: &ReportTable, format: &SinkFormat) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    to_external(table, std::io::BufWriter::new(file), format)
}

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Summary scalars of the table, stamped with the current time.
pub fn summarize(table: &ReportTable) -> ReportSummary {
    let summary = table.summary();
    ReportSummary {
        generated_at: chrono::Utc::now(),
        metric_key: table.metric_key().to_string(),
        total_rows: table.len(),
        skipped_count: table.skipped_count(),
        skipped_entities: table.skipped().to_vec(),
        categories: table.category_counts(),
        max_records: summary
            .max_records
            .iter()
            .filter_map(|(metric, _)| table.max_record(metric))
            .collect(),
        correlation: summary.correlation.clone(),
        metric_stats: summary.metric_stats.clone(),
    }
}

/// Markdown preview of the first `max_rows` rows with grouped, two-decimal
/// numbers. For console display only.
pub fn preview(table: &ReportTable, max_rows: usize) -> String {
    if table.is_empty() || max_rows == 0 {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(field_names(table));
    for row in to_rows(table).iter().take(max_rows) {
        builder.push_record(row.fields.iter().map(|(_, v)| match v {
            FieldValue::Number(n) => format_number(*n, 2),
            other => render_field(other, Precision::Shortest, false),
        }));
    }
    builder.build().with(Style::markdown()).to_string()
}
