use anyhow::{bail, Context};
use csv_window_reader::{AppConfig, CsvReader, DelimiterSpec, KeyMode, ReaderOptions};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: csv-window <FILE> [--delimiter D] [--max-lines N] [--position P] \
[--positional] [--min-rows N] [--config PATH]";

#[derive(Debug, Default)]
struct Args {
    file: String,
    delimiter: Option<String>,
    max_lines: usize,
    position: u64,
    key_mode: KeyMode,
    min_rows: Option<usize>,
    config: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut file = None;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{} needs a value\n{}", name, USAGE))
        };
        match arg.as_str() {
            "--delimiter" | "-d" => parsed.delimiter = Some(value("--delimiter")?),
            "--max-lines" | "-n" => {
                parsed.max_lines = value("--max-lines")?.parse::<usize>().context("--max-lines")?
            }
            "--position" | "-p" => {
                parsed.position = value("--position")?.parse::<u64>().context("--position")?
            }
            "--min-rows" => parsed.min_rows = Some(value("--min-rows")?.parse::<usize>().context("--min-rows")?),
            "--config" | "-c" => parsed.config = Some(value("--config")?),
            "--positional" => parsed.key_mode = KeyMode::Positional,
            "--help" | "-h" => bail!(USAGE),
            other if other.starts_with('-') => bail!("unknown option {}\n{}", other, USAGE),
            other => {
                if file.replace(other.to_string()).is_some() {
                    bail!("only one file may be given\n{}", USAGE);
                }
            }
        }
    }

    parsed.file = file.with_context(|| format!("missing FILE\n{}", USAGE))?;
    Ok(parsed)
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("csv_window_reader={}", config.logging.level).parse()?),
    };
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    init_logging(&config)?;

    let mut options = ReaderOptions::try_from(&config.reader)?;
    if let Some(delimiter) = &args.delimiter {
        options.delimiter = delimiter.parse::<DelimiterSpec>()?;
    }
    if let Some(min_rows) = args.min_rows {
        options.min_rows = min_rows;
    }

    tracing::info!("Reading {} (delimiter: {})", args.file, options.delimiter);

    let mut reader = CsvReader::open_with(&args.file, options)?;
    let rows = reader.get_rows(args.max_lines, args.position, args.key_mode)?;

    let output = serde_json::json!({
        "file": args.file,
        "delimiter": (reader.get_delimiter() as char).to_string(),
        "header": reader.get_header(),
        "rows": rows,
        "position": reader.get_position(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    tracing::info!("Read {} rows, next position {}", rows.len(), reader.get_position());
    reader.close();
    Ok(())
}
