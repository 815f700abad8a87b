pub mod delimiter;
pub mod reader;
pub mod row;
pub mod window;

pub use delimiter::DelimiterFinder;
pub use reader::{CsvReader, DelimiterSpec, ReaderOptions, DEFAULT_MIN_ROWS};
pub use row::{KeyMode, Row};
pub use window::{RowWindow, Windows};
