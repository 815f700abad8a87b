use csv_window_reader::{CsvReader, CsvReaderError, KeyMode, RowWindow};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn csv_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn collect_windows(file: &NamedTempFile, size: usize) -> Vec<RowWindow> {
    let mut reader = CsvReader::open(file.path()).unwrap();
    reader
        .windows(size, KeyMode::Positional)
        .collect::<Result<_, _>>()
        .unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn walks_file_in_windows() {
    let mut reader = CsvReader::open(fixture("CsvTestFile1.csv")).unwrap();
    let first_position = reader.get_position();
    let file_size = reader.file_size();

    let windows: Vec<_> = reader
        .windows(4, KeyMode::Associative)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(windows.len(), 3);
    assert_eq!(
        windows.iter().map(|w| w.row_count()).collect::<Vec<_>>(),
        [4, 4, 2]
    );
    assert!(windows[0].is_first && !windows[0].is_last);
    assert!(windows[2].is_last);
    assert_eq!(windows[0].start_position, first_position);
    assert_eq!(windows[1].start_position, windows[0].end_position);
    assert_eq!(windows[2].end_position, file_size);
    assert_eq!(windows[1].rows[1].get("street"), Some("5828 PEPPERMILL CT"));
}

#[test]
fn window_positions_resume_with_get_rows() {
    let mut reader = CsvReader::open(fixture("CsvTestFile1.csv")).unwrap();
    let second = reader
        .windows(5, KeyMode::Positional)
        .nth(1)
        .unwrap()
        .unwrap();
    assert!(second.is_last);

    let mut reader = CsvReader::open(fixture("CsvTestFile1.csv")).unwrap();
    let rows = reader
        .get_rows(5, second.start_position, KeyMode::Positional)
        .unwrap();
    assert_eq!(rows, second.rows);
    assert_eq!(rows[0].field(0), Some("5828 PEPPERMILL CT"));
}

#[test]
fn final_single_row_window_is_not_rejected() {
    let mut reader = CsvReader::open(fixture("CsvTestFile3.csv")).unwrap();
    let sizes: Vec<usize> = reader
        .windows(3, KeyMode::Associative)
        .map(|w| w.unwrap().row_count())
        .collect();
    assert_eq!(sizes, [3, 1]);
}

#[test]
fn errors_end_iteration() {
    let file = csv_file(b"a,b\n1,2\n3,4\n5\n7,8\n");

    let mut reader = CsvReader::open(file.path()).unwrap();
    let mut windows = reader.windows(2, KeyMode::Associative);

    assert_eq!(windows.next().unwrap().unwrap().row_count(), 2);
    assert!(matches!(
        windows.next(),
        Some(Err(CsvReaderError::InvalidContent(_)))
    ));
    assert!(windows.next().is_none());
}

#[test]
fn zero_size_reads_one_row_at_a_time() {
    let mut reader = CsvReader::open(fixture("CsvTestFile2.csv")).unwrap();
    assert_eq!(reader.windows(0, KeyMode::Associative).count(), 4);
}

#[test]
fn last_full_window_is_flagged_on_crlf_files() {
    let file = csv_file(b"a,b\r\n1,2\r\n3,4\r\n5,6\r\n7,8\r\n");
    let windows = collect_windows(&file, 2);

    assert_eq!(windows.len(), 2);
    assert!(!windows[0].is_last);
    assert!(windows[1].is_last);
    assert_eq!(windows[1].rows[1].field(0), Some("7"));
}

#[test]
fn trailing_blank_lines_do_not_hide_the_last_window() {
    let file = csv_file(b"a,b\n1,2\n3,4\n\n\n");
    let windows = collect_windows(&file, 2);

    assert_eq!(windows.len(), 1);
    assert!(windows[0].is_first && windows[0].is_last);
}

#[test]
fn looking_ahead_does_not_move_the_reader() {
    let file = csv_file(b"a,b\r\n1,2\r\n3,4\r\n5,6\r\n");
    let mut reader = CsvReader::open(file.path()).unwrap();

    let first = reader
        .windows(2, KeyMode::Associative)
        .next()
        .unwrap()
        .unwrap();
    assert!(!first.is_last);
    assert_eq!(reader.get_position(), first.end_position);

    let rest = reader.get_rows(0, 0, KeyMode::Associative).unwrap_err();
    // One row remains, which the default minimum-rows check rejects.
    assert!(rest.is_invalid_content());
    assert_eq!(reader.get_position(), first.end_position);
}
