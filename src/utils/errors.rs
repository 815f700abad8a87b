use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvReaderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("CSV file not found: {0}")]
    FileNotFound(String),

    #[error("Unable to auto-determine delimiter")]
    DelimiterDetectionFailed,

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] ContentError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CsvReaderError {
    pub fn is_invalid_content(&self) -> bool {
        matches!(self, CsvReaderError::InvalidContent(_))
    }
}

/// Ways the file's contents can be unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("no candidate delimiter found in the first line")]
    UndetectableDelimiter,

    #[error("file has no header row")]
    MissingHeader,

    #[error("row at byte {position}: data column count {found} is different from header column count {expected}")]
    ColumnCountMismatch {
        position: u64,
        expected: usize,
        found: usize,
    },

    #[error("row at byte {position}: {length} bytes exceeds the maximum line length of {max}")]
    LineTooLong {
        position: u64,
        length: u64,
        max: usize,
    },

    /// Usually means line endings were not detected and the file collapsed into one row.
    #[error("only {found} row(s) found, expected at least {min}; possible error detecting new lines")]
    TooFewRows { found: usize, min: usize },
}

pub type Result<T> = std::result::Result<T, CsvReaderError>;
