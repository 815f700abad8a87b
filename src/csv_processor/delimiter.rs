use crate::utils::{CsvReaderError, Result};
use std::io::{Read, Seek, SeekFrom};

/// Candidates in tie-break priority order.
pub const DEFAULT_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

/// Guesses the field delimiter from the first line of a stream.
///
/// The candidate occurring most often wins. On equal counts the candidate
/// listed first wins.
#[derive(Debug, Clone)]
pub struct DelimiterFinder {
    candidates: Vec<u8>,
    sample_bytes: usize,
}

impl Default for DelimiterFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimiterFinder {
    pub fn new() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
            sample_bytes: DEFAULT_SAMPLE_BYTES,
        }
    }

    pub fn with_candidates(candidates: impl Into<Vec<u8>>) -> Self {
        Self {
            candidates: candidates.into(),
            sample_bytes: DEFAULT_SAMPLE_BYTES,
        }
    }

    pub fn sample_bytes(mut self, sample_bytes: usize) -> Self {
        self.sample_bytes = sample_bytes.max(1);
        self
    }

    /// Samples the line starting at the stream's current position.
    ///
    /// The stream is put back where it was, whether or not detection succeeds.
    pub fn find<R: Read + Seek>(&self, stream: &mut R) -> Result<u8> {
        let origin = stream.stream_position()?;

        let mut sample = Vec::with_capacity(self.sample_bytes.min(8 * 1024));
        let read = stream
            .by_ref()
            .take(self.sample_bytes as u64)
            .read_to_end(&mut sample);
        stream.seek(SeekFrom::Start(origin))?;
        read?;

        let line_end = sample
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .unwrap_or(sample.len());

        let delimiter = self
            .find_in_line(&sample[..line_end])
            .ok_or(CsvReaderError::DelimiterDetectionFailed)?;

        tracing::debug!(
            "Detected delimiter {:?} from {} byte sample",
            delimiter as char,
            line_end
        );
        Ok(delimiter)
    }

    pub fn find_in_line(&self, line: &[u8]) -> Option<u8> {
        let mut best: Option<(u8, usize)> = None;

        for &candidate in &self.candidates {
            let count = line.iter().filter(|&&b| b == candidate).count();
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((candidate, count)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }
}
