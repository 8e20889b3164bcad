//! Classify economic indicators (debt-to-GDP ratios and similar) into risk
//! bands and build flat report tables for CSV/JSON sinks or chart backends.
//!
//! Flow: records -> [`aggregate::build_table`] (uses [`classify::classify`])
//! -> [`report::to_rows`] / [`report::to_external`].

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod datasets;
pub mod error;
pub mod insights;
pub mod loader;
pub mod report;
pub mod types;
pub mod util;

pub use aggregate::{build_table, BuildOptions, Mode, SortKey, SortOrder};
pub use classify::{classify, Band, Category, ClassificationRule};
pub use error::{ReportError, Result, UndefinedReason};
pub use report::{to_external, to_rows, Precision, SinkFormat};
pub use types::{ClassifiedRecord, Record, ReportTable, Statistic};
