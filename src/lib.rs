//! Windowed CSV reading with delimiter auto-detection.
//!
//! ```no_run
//! use csv_window_reader::{CsvReader, KeyMode};
//!
//! let mut reader = CsvReader::open("sales.csv")?;
//! let first = reader.get_rows(5, 0, KeyMode::Associative)?;
//! let resume_at = reader.get_position();
//! let next = reader.get_rows(5, resume_at, KeyMode::Associative)?;
//! # Ok::<(), csv_window_reader::CsvReaderError>(())
//! ```

pub mod csv_processor;
pub mod utils;

pub use csv_processor::{
    CsvReader, DelimiterFinder, DelimiterSpec, KeyMode, ReaderOptions, Row, RowWindow, Windows,
};
pub use utils::{AppConfig, ContentError, CsvReaderError, Result};
