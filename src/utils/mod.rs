pub mod config;
pub mod errors;

pub use config::{AppConfig, LoggingConfig, ReaderConfig};
pub use errors::{ContentError, CsvReaderError, Result};
