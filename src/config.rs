use crate::aggregate::Mode;
use crate::error::{ReportError, Result};
use crate::report::{Precision, SinkFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR_ENV: &str = "DEBT_REPORT_OUTPUT_DIR";

/// Run settings, read from an optional JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub delimiter: char,
    /// Fixed decimals for numbers; `None` writes the shortest exact form.
    pub precision: Option<usize>,
    pub mode: Mode,
    pub preview_rows: usize,
    pub wait_timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            delimiter: ',',
            precision: None,
            mode: Mode::Strict,
            preview_rows: 5,
            wait_timeout_secs: 60,
        }
    }
}

impl ReportConfig {
    pub fn sink_format(&self) -> Result<SinkFormat> {
        if !self.delimiter.is_ascii() {
            return Err(ReportError::MalformedSource(format!(
                "delimiter '{}' is not a single-byte character",
                self.delimiter
            )));
        }
        Ok(SinkFormat::Delimited {
            delimiter: self.delimiter as u8,
            header: true,
            precision: match self.precision {
                Some(d) => Precision::Fixed(d),
                None => Precision::Shortest,
            },
        })
    }
}

/// Load settings from `path` (defaults when `None` or the file is absent),
/// then apply the output directory override from the environment.
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    let mut config = match path {
        Some(p) if p.exists() => {
            let content = std::fs::read_to_string(p)?;
            serde_json::from_str(&content)?
        }
        Some(p) => {
            log::info!("No config at {}, using defaults", p.display());
            ReportConfig::default()
        }
        None => ReportConfig::default(),
    };
    if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
        if !dir.trim().is_empty() {
            config.output_dir = PathBuf::from(dir);
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{"mode": "lenient", "precision": 2}"#).unwrap();
        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.mode, Mode::Lenient);
        assert_eq!(cfg.precision, Some(2));
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.preview_rows, 5);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = load_config(Some(Path::new("/nonexistent/report.json"))).unwrap();
        assert_eq!(cfg.mode, Mode::Strict);
    }

    #[test]
    fn bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{mode:").unwrap();
        assert!(matches!(load_config(Some(path.as_path())), Err(ReportError::Json(_))));
    }

    #[test]
    fn sink_format_from_config() {
        let cfg = ReportConfig { delimiter: ';', precision: Some(1), ..ReportConfig::default() };
        assert_eq!(
            cfg.sink_format().unwrap(),
            SinkFormat::Delimited { delimiter: b';', header: true, precision: Precision::Fixed(1) }
        );
        let cfg = ReportConfig { delimiter: 'é', ..ReportConfig::default() };
        assert!(cfg.sink_format().is_err());
    }
}
