use crate::csv_processor::reader::CsvReader;
use crate::csv_processor::row::{KeyMode, Row};
use crate::utils::Result;
use serde::Serialize;

/// One batch of rows together with the byte range it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct RowWindow {
    pub index: usize,
    pub start_position: u64,
    pub end_position: u64,
    pub rows: Vec<Row>,
    pub is_first: bool,
    pub is_last: bool,
}

impl RowWindow {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Walks a reader window by window until end of file.
///
/// Short windows are expected here, so the minimum-rows check of
/// [`CsvReader::get_rows`] is not applied. The first error ends iteration.
pub struct Windows<'a> {
    reader: &'a mut CsvReader,
    size: usize,
    key_mode: KeyMode,
    next_index: usize,
    done: bool,
}

impl<'a> Windows<'a> {
    pub(crate) fn new(reader: &'a mut CsvReader, size: usize, key_mode: KeyMode) -> Self {
        Self {
            reader,
            size: size.max(1),
            key_mode,
            next_index: 0,
            done: false,
        }
    }
}

impl Iterator for Windows<'_> {
    type Item = Result<RowWindow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start_position = self.reader.get_position();
        let rows = match self.reader.read_window(self.size, self.key_mode) {
            Ok(rows) => rows,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if rows.is_empty() {
            self.done = true;
            return None;
        }

        let end_position = self.reader.get_position();
        let is_last = if rows.len() < self.size {
            true
        } else {
            match self.reader.at_end() {
                Ok(at_end) => at_end,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        };
        self.done = is_last;

        let index = self.next_index;
        self.next_index += 1;

        Some(Ok(RowWindow {
            index,
            start_position,
            end_position,
            rows,
            is_first: index == 0,
            is_last,
        }))
    }
}
