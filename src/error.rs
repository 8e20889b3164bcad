//! Error types shared by the classifier, aggregator, report builder and loaders.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a cross-record statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Fewer than two paired observations.
    TooFewRecords,
    /// One of the series is constant.
    ZeroVariance,
    /// A value in the series is NaN or infinite.
    NonFinite,
    /// No record carries the metric at all.
    NoValues,
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UndefinedReason::TooFewRecords => "fewer than two records",
            UndefinedReason::ZeroVariance => "zero variance",
            UndefinedReason::NonFinite => "non-finite input",
            UndefinedReason::NoValues => "no values",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// A metric value is NaN or infinite.
    #[error("invalid value {value} for metric '{metric}'{}", entity_suffix(.entity))]
    InvalidMetric {
        entity: Option<String>,
        metric: String,
        value: f64,
    },

    /// A record lacks the metric required for classification.
    #[error("entity '{entity}' has no value for metric '{metric}'")]
    MissingMetric { entity: String, metric: String },

    #[error("statistic '{statistic}' is undefined: {reason}")]
    UndefinedStatistic {
        statistic: String,
        reason: UndefinedReason,
    },

    #[error("invalid classification rule: {0}")]
    InvalidRule(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("malformed source data: {0}")]
    MalformedSource(String),

    #[error("timed out after {waited:?} waiting for {}", .path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn entity_suffix(entity: &Option<String>) -> String {
    match entity {
        Some(e) => format!(" (entity '{}')", e),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
