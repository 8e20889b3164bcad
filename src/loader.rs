use crate::error::{ReportError, Result};
use crate::types::Record;
use crate::util::{parse_f64_safe, parse_i32_safe};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Metric name used for the IMF general government gross debt indicator.
pub const DEBT_RATIO_METRIC: &str = "Debt-to-GDP Ratio (%)";
/// IMF DataMapper code for general government gross debt, percent of GDP.
pub const IMF_DEBT_INDICATOR: &str = "GGXWDG_NGDP";
/// Years tried in order when a country has several observations.
pub const DEFAULT_PREFERRED_YEARS: [i32; 5] = [2024, 2023, 2022, 2021, 2020];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows dropped entirely (no entity name, bad period).
    pub skipped_rows: usize,
    /// Individual metric cells that could not be parsed.
    pub parse_errors: usize,
}

/// Column layout of a wide CSV table.
#[derive(Debug, Clone)]
pub struct CsvLayout {
    pub entity_column: String,
    /// When absent every row gets `default_period`.
    pub period_column: Option<String>,
    pub default_period: i32,
    pub delimiter: u8,
}

impl CsvLayout {
    pub fn new(entity_column: impl Into<String>, default_period: i32) -> Self {
        Self { entity_column: entity_column.into(), period_column: None, default_period, delimiter: b',' }
    }

    pub fn with_period_column(mut self, column: impl Into<String>) -> Self {
        self.period_column = Some(column.into());
        self
    }
}

/// Read a header-first CSV where every column other than the entity and
/// period columns is a numeric metric.
pub fn load_records_csv<P: AsRef<Path>>(path: P, layout: &CsvLayout) -> Result<(Vec<Record>, LoadReport)> {
    let rdr = ReaderBuilder::new().delimiter(layout.delimiter).flexible(true).from_path(path)?;
    read_records(rdr, layout)
}

pub fn read_records_csv<R: std::io::Read>(reader: R, layout: &CsvLayout) -> Result<(Vec<Record>, LoadReport)> {
    let rdr = ReaderBuilder::new().delimiter(layout.delimiter).flexible(true).from_reader(reader);
    read_records(rdr, layout)
}

fn read_records<R: std::io::Read>(mut rdr: csv::Reader<R>, layout: &CsvLayout) -> Result<(Vec<Record>, LoadReport)> {
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let entity_idx = position(layout.entity_column.as_str()).ok_or_else(|| {
        ReportError::MalformedSource(format!("missing entity column '{}'", layout.entity_column))
    })?;
    let period_idx = match &layout.period_column {
        Some(col) => Some(
            position(col.as_str()).ok_or_else(|| ReportError::MalformedSource(format!("missing period column '{}'", col)))?,
        ),
        None => None,
    };

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable row {}: {}", report.total_rows, e);
                report.skipped_rows += 1;
                continue;
            }
        };

        let period = match period_idx {
            Some(i) => match parse_i32_safe(row.get(i)) {
                Some(p) => p,
                None => {
                    report.skipped_rows += 1;
                    continue;
                }
            },
            None => layout.default_period,
        };

        let mut metrics = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i == entity_idx || Some(i) == period_idx {
                continue;
            }
            match parse_f64_safe(row.get(i)) {
                Some(v) => metrics.push((header.trim().to_string(), v)),
                None => report.parse_errors += 1,
            }
        }

        match Record::new(row.get(entity_idx).unwrap_or_default(), period, metrics) {
            Ok(r) => records.push(r),
            Err(e) => {
                log::warn!("Skipping row {}: {}", report.total_rows, e);
                report.skipped_rows += 1;
            }
        }
    }
    report.loaded_rows = records.len();
    log::info!(
        "Loaded {} of {} rows ({} skipped, {} unparseable cells)",
        report.loaded_rows,
        report.total_rows,
        report.skipped_rows,
        report.parse_errors
    );
    Ok((records, report))
}

/// Country code to display name from the DataMapper `countries` document:
/// `{"countries": {"USA": {"label": "United States"}, ...}}`.
pub fn parse_imf_countries(json: &str) -> Result<HashMap<String, String>> {
    let doc: Value = serde_json::from_str(json)?;
    let countries = doc
        .get("countries")
        .and_then(Value::as_object)
        .ok_or_else(|| ReportError::MalformedSource("no 'countries' object".into()))?;
    Ok(countries
        .iter()
        .filter_map(|(code, v)| Some((code.clone(), v.get("label")?.as_str()?.to_string())))
        .collect())
}

/// One record per country from a DataMapper indicator document:
/// `{"values": {INDICATOR: {CODE: {"2024": 38.8, ...}}}}`.
///
/// The first year of `preferred_years` present for a country is used. If that
/// value is not numeric, or no preferred year is present, the country is
/// counted as skipped. Entities are named from `names`, falling back to the
/// country code; the code itself is not kept on the record.
pub fn parse_imf_datamapper(
    json: &str,
    indicator: &str,
    preferred_years: &[i32],
    names: &HashMap<String, String>,
) -> Result<(Vec<Record>, LoadReport)> {
    let doc: Value = serde_json::from_str(json)?;
    let series = doc
        .get("values")
        .and_then(|v| v.get(indicator))
        .and_then(Value::as_object)
        .ok_or_else(|| ReportError::MalformedSource(format!("indicator '{}' not found", indicator)))?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for (code, years) in series {
        report.total_rows += 1;
        // Only the newest preferred year present counts; a non-numeric value
        // there drops the country rather than falling back to an older year.
        let Some(year) = preferred_years.iter().copied().find(|y| years.get(y.to_string()).is_some()) else {
            report.skipped_rows += 1;
            continue;
        };
        let value = match years.get(year.to_string()) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => parse_f64_safe(Some(s.as_str())),
            _ => None,
        };
        let Some(value) = value else {
            log::warn!("Skipping country '{}': non-numeric value for {}", code, year);
            report.skipped_rows += 1;
            report.parse_errors += 1;
            continue;
        };
        let name = names.get(code).map(String::as_str).unwrap_or(code.as_str());
        match Record::new(name, year, vec![(DEBT_RATIO_METRIC.to_string(), value)]) {
            Ok(r) => records.push(r),
            Err(e) => {
                log::warn!("Skipping country '{}': {}", code, e);
                report.skipped_rows += 1;
            }
        }
    }
    report.loaded_rows = records.len();
    log::info!("Processed {} countries for {}", report.loaded_rows, indicator);
    Ok((records, report))
}

/// Block until `path` exists, polling every `poll`. Fails with
/// `ReportError::Timeout` once `timeout` has elapsed.
pub fn wait_for_file<P: AsRef<Path>>(path: P, timeout: Duration, poll: Duration) -> Result<()> {
    let path = path.as_ref();
    let start = Instant::now();
    loop {
        if path.exists() {
            return Ok(());
        }
        let waited = start.elapsed();
        if waited >= timeout {
            return Err(ReportError::Timeout { path: path.to_path_buf(), waited });
        }
        log::debug!("Waiting for {}", path.display());
        std::thread::sleep(poll.min(timeout - waited));
    }
}
