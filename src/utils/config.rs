use crate::csv_processor::delimiter::{DEFAULT_CANDIDATES, DEFAULT_SAMPLE_BYTES};
use crate::csv_processor::reader::{DelimiterSpec, ReaderOptions, DEFAULT_MIN_ROWS};
use crate::utils::errors::{CsvReaderError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reader: ReaderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// `"auto"` or a single character.
    pub delimiter: String,
    pub max_line_length: usize,
    pub min_rows: usize,
    /// Detection candidates in priority order.
    pub candidates: String,
    pub sample_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: "auto".to_string(),
            max_line_length: 0,
            min_rows: DEFAULT_MIN_ROWS,
            candidates: DEFAULT_CANDIDATES.iter().map(|&b| b as char).collect(),
            sample_bytes: DEFAULT_SAMPLE_BYTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CsvReaderError::ConfigError(format!("{}: {}", path, e)))?;
        toml::from_str(&content).map_err(|e| CsvReaderError::ConfigError(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("Falling back to default configuration: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

impl TryFrom<&ReaderConfig> for ReaderOptions {
    type Error = CsvReaderError;

    fn try_from(config: &ReaderConfig) -> Result<Self> {
        let delimiter: DelimiterSpec = config.delimiter.parse()?;

        let mut candidates = Vec::with_capacity(config.candidates.len());
        for c in config.candidates.chars() {
            if !c.is_ascii() {
                return Err(CsvReaderError::ConfigError(format!(
                    "delimiter candidate {:?} is not ASCII",
                    c
                )));
            }
            candidates.push(c as u8);
        }
        if candidates.is_empty() {
            return Err(CsvReaderError::ConfigError(
                "at least one delimiter candidate is required".to_string(),
            ));
        }

        Ok(ReaderOptions {
            delimiter,
            max_line_length: config.max_line_length,
            min_rows: config.min_rows,
            candidates,
            sample_bytes: config.sample_bytes,
        })
    }
}
