//! csv-lens CLI - explore a CSV file from the terminal

use clap::{Parser, Subcommand};
use csv_lens::{
    BinCapacity, ChartKind, ColumnAnalysis, DEFAULT_PAGE_SIZE, Dataset, Distribution,
    INLINE_TOP_VALUES, Loader, MISSING_CHART_COLUMNS, Report, VALUE_DISPLAY_CHARS, analyze_column,
    build_chart, compute_distribution, export_csv, export_json, filter_rows, format_cell,
    format_count, format_file_size, format_number, missing_chart, paginate, profile_dataset,
    row_records, summarize_statistics, to_fixed,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Width of the longest bar in text histograms.
const BAR_WIDTH: usize = 40;

/// CSV explorer: type inference, statistics, histograms and data quality.
#[derive(Parser, Debug)]
#[command(name = "csv-lens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force specific delimiter (single character)
    #[arg(short = 'd', long, global = true)]
    delimiter: Option<char>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log loading details to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset overview: size, completeness, column types, missing values
    Overview {
        /// Input CSV file
        file: PathBuf,
    },
    /// Profile and statistics for one column
    Column {
        /// Input CSV file
        file: PathBuf,
        /// Column name
        column: String,
    },
    /// Statistics for every numeric and text column
    Stats {
        /// Input CSV file
        file: PathBuf,
    },
    /// Search and page through rows
    Table {
        /// Input CSV file
        file: PathBuf,
        /// Case-insensitive substring to search for
        #[arg(short = 's', long, default_value = "")]
        search: String,
        /// Page number (1-based)
        #[arg(short = 'p', long, default_value_t = 1)]
        page: usize,
        /// Rows per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Histogram or top values of one column
    Distribution {
        /// Input CSV file
        file: PathBuf,
        /// Column name
        column: String,
    },
    /// Series for a chart of one column against another
    Chart {
        /// Input CSV file
        file: PathBuf,
        /// Column on the x axis
        #[arg(short = 'x', long)]
        x: String,
        /// Column on the y axis
        #[arg(short = 'y', long)]
        y: String,
        /// Chart type: bar, line, scatter or pie
        #[arg(short = 'k', long, default_value = "bar")]
        kind: ChartKind,
    },
    /// Plain-text data analysis report
    Report {
        /// Input CSV file
        file: PathBuf,
        /// Write the report to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Re-export the typed dataset
    Export {
        /// Input CSV file
        file: PathBuf,
        /// Output format
        #[arg(short = 'f', long, default_value = "csv")]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    fn file(&self) -> &PathBuf {
        match self {
            Command::Overview { file }
            | Command::Column { file, .. }
            | Command::Stats { file }
            | Command::Table { file, .. }
            | Command::Distribution { file, .. }
            | Command::Chart { file, .. }
            | Command::Report { file, .. }
            | Command::Export { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = args.command.file();
    if let Err(e) = run(&args) {
        eprintln!("Error processing {}: {}", file.display(), e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load(path: &PathBuf, args: &Args) -> csv_lens::Result<Dataset> {
    let mut loader = Loader::new();
    if let Some(delim) = args.delimiter {
        if !delim.is_ascii() {
            return Err(csv_lens::LensError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {delim:?}"
            )));
        }
        loader.delimiter(delim as u8);
    }

    #[cfg(feature = "http")]
    {
        let raw = path.to_string_lossy();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return loader.load_url(&raw);
        }
    }

    loader.load_path(path)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: &Args) -> CliResult {
    let dataset = load(args.command.file(), args)?;

    match &args.command {
        Command::Overview { .. } => overview(&dataset, args.json),
        Command::Column { column, .. } => column_view(&dataset, column, args.json),
        Command::Stats { .. } => stats_view(&dataset, args.json),
        Command::Table {
            search,
            page,
            page_size,
            ..
        } => table_view(&dataset, search, *page, *page_size, args.json),
        Command::Distribution { column, .. } => distribution_view(&dataset, column, args.json),
        Command::Chart { x, y, kind, .. } => {
            let series = build_chart(&dataset, x, y, *kind);
            if args.json {
                return print_json(&series);
            }
            println!("{}", series.title);
            for point in &series.points {
                println!("  {}\t{}", format_cell(&point.x), format_cell(&point.y));
            }
            let total: f64 = series.slices.iter().map(|s| s.value).sum();
            for slice in &series.slices {
                println!(
                    "  {}\t{} ({}%)",
                    slice.label,
                    format_number(slice.value),
                    slice.share(total)
                );
            }
            Ok(())
        }
        Command::Report { output, .. } => {
            let profile = profile_dataset(&dataset);
            let text = Report::new(&dataset, &profile).render();
            match output {
                Some(path) => {
                    fs::write(path, text)?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => print!("{text}"),
            }
            Ok(())
        }
        Command::Export { format, output, .. } => {
            let text = match format {
                ExportFormat::Csv => export_csv(&dataset)?,
                ExportFormat::Json => export_json(&dataset)?,
            };
            match output {
                Some(path) => fs::write(path, text)?,
                None => print!("{text}"),
            }
            Ok(())
        }
    }
}

fn overview(dataset: &Dataset, json: bool) -> CliResult {
    let profile = profile_dataset(dataset);
    if json {
        return print_json(&profile);
    }

    if let Some(source) = dataset.source() {
        match source.size_bytes {
            Some(size) => println!("File: {} ({})", source.name, format_file_size(size)),
            None => println!("File: {}", source.name),
        }
    }
    println!("  Rows: {}", format_count(profile.num_rows));
    println!("  Columns: {}", format_count(profile.num_columns));
    println!("  Completeness: {}%", to_fixed(profile.completeness, 1));
    println!(
        "  Data density: {}% (numeric {}%, text {}%)",
        profile.density_percent(),
        profile.numeric_share(),
        profile.text_share()
    );

    println!("  Columns:");
    for col in &profile.columns {
        println!(
            "    {}: {} ({} unique, {}% missing)",
            col.name,
            col.dominant_type.overview_label(),
            format_count(col.unique_count),
            to_fixed(col.missing_percent, 1)
        );
    }

    let missing: Vec<_> = missing_chart(&profile)
        .iter()
        .filter(|m| m.missing > 0)
        .collect();
    if !missing.is_empty() {
        println!("  Missing values (top {MISSING_CHART_COLUMNS}):");
        for entry in missing {
            println!(
                "    {}: {} ({}%, {})",
                entry.column,
                format_count(entry.missing),
                to_fixed(entry.percent, 1),
                entry.severity
            );
        }
    }

    let keys: Vec<&str> = profile.candidate_keys().map(|c| c.name.as_str()).collect();
    if !keys.is_empty() {
        println!("  Candidate keys: {}", keys.join(", "));
    }

    Ok(())
}

fn column_view(dataset: &Dataset, column: &str, json: bool) -> CliResult {
    let analysis = analyze_column(dataset, column);
    if json {
        return print_json(&analysis);
    }

    let ColumnAnalysis::Analysis {
        profile,
        numeric,
        histogram,
        text,
    } = analysis
    else {
        println!("No data available for column {column:?}");
        return Ok(());
    };

    println!("Column: {}", profile.name);
    println!("  Type: {}", profile.dominant_type);
    println!(
        "  Non-empty: {} of {}",
        format_count(profile.non_empty),
        format_count(profile.total)
    );
    println!("  Unique values: {}", format_count(profile.unique_count));
    println!(
        "  Missing: {}% ({})",
        to_fixed(profile.missing_percent, 1),
        profile.severity
    );

    if let Some(stats) = numeric {
        println!("  Min: {}", format_number(stats.min));
        println!("  Max: {}", format_number(stats.max));
        println!("  Mean: {}", format_number(stats.mean));
        println!("  Median: {}", format_number(stats.median));
        println!("  Std dev: {}", format_number(stats.std_dev));
        print_bars(histogram.iter().map(|b| (b.label.as_str(), b.count)));
    }

    if let Some(stats) = text {
        println!("  Average length: {}", format_number(stats.avg_length));
        println!("  Top values:");
        for entry in stats.top(INLINE_TOP_VALUES) {
            println!(
                "    {}: {} ({}%)",
                entry.display_value(VALUE_DISPLAY_CHARS),
                format_count(entry.count),
                to_fixed(entry.share(stats.count), 1)
            );
        }
    }

    Ok(())
}

fn stats_view(dataset: &Dataset, json: bool) -> CliResult {
    let summary = summarize_statistics(dataset);
    if json {
        return print_json(&summary);
    }

    if !summary.numeric.is_empty() {
        println!("Numeric columns:");
        println!("  column\tcount\tmin\tmax\tmean\tmedian\tstd dev");
        for row in &summary.numeric {
            let s = &row.stats;
            println!(
                "  {}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.column,
                format_count(s.count),
                format_number(s.min),
                format_number(s.max),
                format_number(s.mean),
                format_number(s.median),
                format_number(s.std_dev)
            );
        }
    }

    if !summary.text.is_empty() {
        println!("Text columns:");
        println!("  column\tcount\tunique\tavg length\tmost common");
        for row in &summary.text {
            let s = &row.stats;
            println!(
                "  {}\t{}\t{}\t{}\t{}",
                row.column,
                format_count(s.count),
                format_count(s.unique_count),
                format_number(s.avg_length),
                row.most_common_label()
            );
        }
    }

    Ok(())
}

fn table_view(
    dataset: &Dataset,
    search: &str,
    page: usize,
    page_size: usize,
    json: bool,
) -> CliResult {
    let rows = filter_rows(dataset, search);
    let page = paginate(&rows, page_size, page);

    if json {
        return print_json(&row_records(dataset, page.items.iter().copied()));
    }

    println!("{}", dataset.columns().join("\t"));
    for row in page.items {
        let cells: Vec<String> = (0..dataset.num_columns())
            .map(|idx| format_cell(row.get(idx)))
            .collect();
        println!("{}", cells.join("\t"));
    }

    let shown_to = page.start + page.items.len();
    let first = if page.items.is_empty() { 0 } else { page.start + 1 };
    println!(
        "Showing {}-{} of {} rows (page {} of {})",
        format_count(first),
        format_count(shown_to),
        format_count(page.total_rows),
        page.page_number,
        page.total_pages
    );

    Ok(())
}

fn distribution_view(dataset: &Dataset, column: &str, json: bool) -> CliResult {
    let distribution = compute_distribution(dataset, column);
    if json {
        return print_json(&distribution);
    }

    match distribution {
        Distribution::Numeric(bins) => {
            println!(
                "Histogram of {column} ({} bins max)",
                BinCapacity::Standalone.cap()
            );
            print_bars(bins.iter().map(|b| (b.label.as_str(), b.count)));
        }
        Distribution::Categorical { bars, total } => {
            println!("Top values of {column} ({} non-empty)", format_count(total));
            print_bars(bars.iter().map(|b| (b.label.as_str(), b.entry.count)));
        }
        Distribution::NoData => println!("No data available for column {column:?}"),
    }

    Ok(())
}

/// Print labelled counts as horizontal bars scaled to [`BAR_WIDTH`].
fn print_bars<'a, I>(bars: I)
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let bars: Vec<(&str, usize)> = bars.into_iter().collect();
    let max = bars.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let label_width = bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    for (label, count) in bars {
        let width = (count * BAR_WIDTH).div_ceil(max);
        println!(
            "  {label:<label_width$}  {} {}",
            "#".repeat(width),
            format_count(count)
        );
    }
}
