use crate::csv_processor::delimiter::{DelimiterFinder, DEFAULT_CANDIDATES, DEFAULT_SAMPLE_BYTES};
use crate::csv_processor::row::{KeyMode, Row};
use crate::csv_processor::window::Windows;
use crate::utils::{ContentError, CsvReaderError, Result};
use csv::{Position, StringRecord};
use std::fmt;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `get_rows` fails when it produces fewer rows than this, unless overridden.
pub const DEFAULT_MIN_ROWS: usize = 2;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelimiterSpec {
    #[default]
    Auto,
    Explicit(u8),
}

impl DelimiterSpec {
    pub fn explicit(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(CsvReaderError::InvalidDelimiter(format!("{:?}", delimiter)));
        }
        let delimiter = delimiter as u8;
        validate_delimiter(delimiter)?;
        Ok(DelimiterSpec::Explicit(delimiter))
    }
}

/// Line terminators and the quote byte would make every record unparseable.
fn validate_delimiter(delimiter: u8) -> Result<u8> {
    if !delimiter.is_ascii() || matches!(delimiter, b'\r' | b'\n' | b'"') {
        return Err(CsvReaderError::InvalidDelimiter(format!(
            "{:?}",
            delimiter as char
        )));
    }
    Ok(delimiter)
}

impl FromStr for DelimiterSpec {
    type Err = CsvReaderError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(DelimiterSpec::Auto);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => DelimiterSpec::explicit(c),
            _ => Err(CsvReaderError::InvalidDelimiter(format!("{:?}", s))),
        }
    }
}

impl fmt::Display for DelimiterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterSpec::Auto => write!(f, "auto"),
            DelimiterSpec::Explicit(b) => write!(f, "{}", *b as char),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    pub delimiter: DelimiterSpec,
    /// Longest accepted record in bytes, counting field contents and
    /// delimiters but not quotes or the line terminator. 0 is unbounded.
    pub max_line_length: usize,
    /// Minimum rows a `get_rows` call must produce. 0 disables the check.
    pub min_rows: usize,
    pub candidates: Vec<u8>,
    pub sample_bytes: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: DelimiterSpec::Auto,
            max_line_length: 0,
            min_rows: DEFAULT_MIN_ROWS,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            sample_bytes: DEFAULT_SAMPLE_BYTES,
        }
    }
}

impl ReaderOptions {
    pub fn delimiter(mut self, delimiter: DelimiterSpec) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }
}

/// Reads a CSV file a window of rows at a time.
///
/// The reader owns its file handle for its whole lifetime; dropping it (or
/// calling [`CsvReader::close`]) releases the handle. Fetching rows needs
/// `&mut self`, so a reader shared between threads must be synchronized by
/// the caller.
pub struct CsvReader {
    path: PathBuf,
    reader: csv::Reader<File>,
    header: Vec<String>,
    delimiter: u8,
    file_size: u64,
    options: ReaderOptions,
}

impl fmt::Debug for CsvReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvReader")
            .field("path", &self.path)
            .field("delimiter", &(self.delimiter as char))
            .field("header", &self.header)
            .field("position", &self.get_position())
            .finish()
    }
}

impl CsvReader {
    /// Opens `path` and auto-detects its delimiter.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReaderOptions::default())
    }

    pub fn with_delimiter(path: impl AsRef<Path>, delimiter: DelimiterSpec) -> Result<Self> {
        Self::open_with(path, ReaderOptions::default().delimiter(delimiter))
    }

    pub fn open_with(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CsvReaderError::FileNotFound(path.display().to_string()));
        }

        let mut file = File::open(path).map_err(|e| {
            tracing::debug!("Failed to open {}: {}", path.display(), e);
            CsvReaderError::FileNotFound(path.display().to_string())
        })?;
        let file_size = file.metadata()?.len();

        let delimiter = match options.delimiter {
            DelimiterSpec::Explicit(b) => validate_delimiter(b)?,
            DelimiterSpec::Auto => DelimiterFinder::with_candidates(options.candidates.clone())
                .sample_bytes(options.sample_bytes)
                .find(&mut file)
                .map_err(|e| match e {
                    CsvReaderError::DelimiterDetectionFailed => {
                        CsvReaderError::InvalidContent(ContentError::UndetectableDelimiter)
                    }
                    other => other,
                })?,
        };

        file.seek(SeekFrom::Start(0))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut record = StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Err(ContentError::MissingHeader.into());
        }
        let header: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    name.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();

        tracing::debug!(
            "Opened {} with delimiter {:?} and {} columns",
            path.display(),
            delimiter as char,
            header.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            header,
            delimiter,
            file_size,
            options,
        })
    }

    /// Reads up to `max_lines` rows (0 = to end of file).
    ///
    /// A nonzero `start_position` seeks there first; it should be a value
    /// previously returned by [`CsvReader::get_position`]. On error nothing
    /// is returned and the reader goes back to where this call started.
    pub fn get_rows(
        &mut self,
        max_lines: usize,
        start_position: u64,
        key_mode: KeyMode,
    ) -> Result<Vec<Row>> {
        if start_position > 0 {
            self.seek(start_position)?;
        }
        let start = self.reader.position().clone();

        let result = self.read_window(max_lines, key_mode).and_then(|rows| {
            if rows.len() < self.options.min_rows {
                tracing::warn!(
                    "Only {} row(s) read from {} at byte {}",
                    rows.len(),
                    self.path.display(),
                    start.byte()
                );
                return Err(ContentError::TooFewRows {
                    found: rows.len(),
                    min: self.options.min_rows,
                }
                .into());
            }
            Ok(rows)
        });

        if result.is_err() {
            if let Err(e) = self.reader.seek(start) {
                tracing::warn!("Failed to rewind {} after error: {}", self.path.display(), e);
            }
        }
        result
    }

    /// Continues from the current position.
    pub fn next_rows(&mut self, max_lines: usize) -> Result<Vec<Row>> {
        self.get_rows(max_lines, 0, KeyMode::Associative)
    }

    pub fn windows(&mut self, size: usize, key_mode: KeyMode) -> Windows<'_> {
        Windows::new(self, size, key_mode)
    }

    /// Byte offset of the next unread record.
    pub fn get_position(&self) -> u64 {
        self.reader.position().byte()
    }

    pub fn get_header(&self) -> &[String] {
        &self.header
    }

    pub fn get_delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn close(self) {
        tracing::debug!("Closing {}", self.path.display());
    }

    fn seek(&mut self, byte: u64) -> Result<()> {
        let mut position = Position::new();
        position.set_byte(byte);
        self.reader.seek(position)?;
        Ok(())
    }

    /// True when no record remains. The position is left unchanged, so
    /// trailing terminators and blank lines still count as end of file.
    pub(crate) fn at_end(&mut self) -> Result<bool> {
        let here = self.reader.position().clone();
        let mut spare = StringRecord::new();
        let more = self.reader.read_record(&mut spare);
        self.reader.seek(here)?;
        Ok(!more?)
    }

    /// Reads without the minimum-rows check and without rollback.
    pub(crate) fn read_window(&mut self, max_lines: usize, key_mode: KeyMode) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut record = StringRecord::new();

        while max_lines == 0 || rows.len() < max_lines {
            let before = self.get_position();
            if !self.reader.read_record(&mut record)? {
                break;
            }
            let record_start = record.position().map_or(before, |p| p.byte());
            let length = record_length(&record);

            if self.options.max_line_length > 0 && length > self.options.max_line_length as u64 {
                return Err(ContentError::LineTooLong {
                    position: record_start,
                    length,
                    max: self.options.max_line_length,
                }
                .into());
            }

            rows.push(self.build_row(&record, record_start, key_mode)?);
        }

        tracing::debug!(
            "Read {} rows from {}, now at byte {}",
            rows.len(),
            self.path.display(),
            self.get_position()
        );
        Ok(rows)
    }

    fn build_row(&self, record: &StringRecord, position: u64, key_mode: KeyMode) -> Result<Row> {
        if record.len() != self.header.len() {
            return Err(ContentError::ColumnCountMismatch {
                position,
                expected: self.header.len(),
                found: record.len(),
            }
            .into());
        }

        let values = record.iter().map(str::to_string);
        Ok(match key_mode {
            KeyMode::Associative => Row::Associative(self.header.iter().cloned().zip(values).collect()),
            KeyMode::Positional => Row::Positional(values.collect()),
        })
    }
}

/// Independent of skipped blank lines and of the terminator style.
fn record_length(record: &StringRecord) -> u64 {
    let fields: usize = record.iter().map(str::len).sum();
    (fields + record.len().saturating_sub(1)) as u64
}
