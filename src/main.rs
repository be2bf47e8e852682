mod config;
mod error;
mod export;
mod report;
mod source;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_columns, load_config, resolve_output_dir, ColumnCatalog, Config,
    COLUMNS_TEMPLATE, CONFIG_TEMPLATE,
};
use crate::error::{CarteraError, Result};
use crate::export::{export_filename, ExportFormat, ExportJob, ExportStep};
use crate::report::aging::AGING_COLUMNS;
use crate::report::combine::{DETAIL_COLUMNS, SUMMARY_COLUMNS};
use crate::report::format::format_cell;
use crate::report::{
    bucketize, combine, AgingOrder, AgingSpec, CombineSpec, Pager, Row, Value,
};

#[derive(Parser)]
#[command(name = "cartera")]
#[command(version, about = "CLI ledger reporting and export toolkit", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.cartera or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Alphabetic by razon social
    Name,
    /// Lexicographic by NIT
    Nit,
}

impl From<OrderArg> for AgingOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Name => AgingOrder::Name,
            OrderArg::Nit => AgingOrder::Nit,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show configuration summary
    Status,

    /// List the configured column catalog
    Columns,

    /// Display rows from a file or URL as a paged table
    View {
        /// Row source: JSON file path or http(s) URL
        #[arg(short, long)]
        input: String,

        /// Comma-separated column keys (default: first row's keys)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Page to display (1-indexed, 100 rows per page)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Combine movement history with balances into a balance report
    Balance {
        /// Movement history row source
        #[arg(long)]
        history: String,

        /// Balance row source
        #[arg(long)]
        balances: String,

        /// Sort by razon social instead of history order
        #[arg(long)]
        alphabetic: bool,

        /// Condensed column layout (NIT, razon social, balance, detail)
        #[arg(long)]
        summary: bool,

        /// Page to display (1-indexed, 100 rows per page)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Also export the full report
        #[arg(long, value_enum)]
        export: Option<FormatArg>,

        /// Base name for the exported file
        #[arg(long, default_value = "reporte_saldos")]
        name: String,
    },

    /// Build the receivables aging report from annex rows
    Aging {
        /// Row source with due dates and amounts
        #[arg(short, long)]
        input: String,

        /// Cutoff date YYYY-MM-DD (default: today)
        #[arg(long)]
        cutoff: Option<String>,

        /// Record ordering
        #[arg(long, value_enum, default_value_t = OrderArg::Name)]
        order: OrderArg,

        /// Page to display (1-indexed, 100 rows per page)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Also export the full report
        #[arg(long, value_enum)]
        export: Option<FormatArg>,

        /// Base name for the exported file
        #[arg(long, default_value = "reporte_cartera")]
        name: String,
    },

    /// Export rows from a file or URL to CSV or XLSX
    Export {
        /// Row source: JSON file path or http(s) URL
        #[arg(short, long)]
        input: String,

        /// Output format
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Base name for the exported file
        #[arg(short, long)]
        name: String,

        /// Comma-separated column keys (default: first row's keys)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Columns => cmd_columns(&cfg_dir),
        Commands::View {
            input,
            columns,
            page,
        } => cmd_view(&cfg_dir, &input, columns, page),
        Commands::Balance {
            history,
            balances,
            alphabetic,
            summary,
            page,
            export,
            name,
        } => cmd_balance(
            &cfg_dir, &history, &balances, alphabetic, summary, page, export, &name,
        ),
        Commands::Aging {
            input,
            cutoff,
            order,
            page,
            export,
            name,
        } => cmd_aging(&cfg_dir, &input, cutoff, order, page, export, &name),
        Commands::Export {
            input,
            format,
            name,
            columns,
        } => cmd_export(&cfg_dir, &input, format, &name, columns),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(CarteraError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("exports"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("columns.toml"), COLUMNS_TEMPLATE)?;

    println!("Initialized cartera config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Adjust export settings:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Extend the column catalog: $EDITOR {}/columns.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then run your first report:");
    println!("  cartera aging --input rows.json --cutoff 2024-04-15");

    Ok(())
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

/// Show configuration summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let catalog = load_columns(cfg_dir)?;
    let output_dir = resolve_output_dir(&config.export.output_dir, cfg_dir);

    println!("Cartera Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Output directory: {}", output_dir.display());
    println!("CSV delimiter:    '{}'", config.export.delimiter);
    println!("Sheet name:       {}", config.export.sheet_name);
    println!("HTTP timeout:     {}s", config.source.timeout_secs);
    println!("Columns:          {}", catalog.len());

    Ok(())
}

/// List the configured column catalog
fn cmd_columns(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let catalog = load_columns(cfg_dir)?;

    if catalog.is_empty() {
        println!("No columns configured.");
        println!("Add columns to: {}/columns.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<ColumnRow> = catalog
        .sorted()
        .into_iter()
        .map(|(key, column)| ColumnRow {
            key: key.to_string(),
            kind: format!("{:?}", column.kind).to_lowercase(),
            description: column.description.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Display rows from a file or URL as a paged table
fn cmd_view(cfg_dir: &Path, input: &str, columns: Option<Vec<String>>, page: usize) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let catalog = load_columns(cfg_dir)?;
    let rows = source::load_rows(input, &config.source)?;
    let columns = resolve_columns(columns, &rows);

    render_page(&rows, &columns, &catalog, page);
    Ok(())
}

/// Combine movement history with balances into a balance report
#[allow(clippy::too_many_arguments)]
fn cmd_balance(
    cfg_dir: &Path,
    history: &str,
    balances: &str,
    alphabetic: bool,
    summary: bool,
    page: usize,
    export: Option<FormatArg>,
    name: &str,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let catalog = load_columns(cfg_dir)?;

    let history_rows = source::load_rows(history, &config.source)?;
    let balance_rows = source::load_rows(balances, &config.source)?;

    let spec = CombineSpec {
        alphabetic,
        ..CombineSpec::default()
    };
    let merged = combine(&history_rows, &balance_rows, &spec);

    let layout: &[&str] = if summary {
        &SUMMARY_COLUMNS
    } else {
        &DETAIL_COLUMNS
    };
    let columns: Vec<String> = layout.iter().map(|s| s.to_string()).collect();

    render_page(&merged, &columns, &catalog, page);

    if let Some(format) = export {
        run_export(cfg_dir, &config, &merged, &columns, &catalog, name, format.into())?;
    }

    Ok(())
}

/// Build the receivables aging report from annex rows
fn cmd_aging(
    cfg_dir: &Path,
    input: &str,
    cutoff: Option<String>,
    order: OrderArg,
    page: usize,
    export: Option<FormatArg>,
    name: &str,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let catalog = load_columns(cfg_dir)?;
    let rows = source::load_rows(input, &config.source)?;

    let cutoff = match cutoff {
        Some(s) => chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| CarteraError::InvalidDate(s))?,
        None => chrono::Local::now().date_naive(),
    };

    let spec = AgingSpec {
        order: order.into(),
        ..AgingSpec::default()
    };
    let records = bucketize(&rows, cutoff, &spec);
    let report_rows: Vec<Row> = records.iter().map(|r| r.to_row()).collect();
    let columns: Vec<String> = AGING_COLUMNS.iter().map(|s| s.to_string()).collect();

    println!("Aging report with cutoff {cutoff}");
    render_page(&report_rows, &columns, &catalog, page);

    if let Some(format) = export {
        run_export(
            cfg_dir,
            &config,
            &report_rows,
            &columns,
            &catalog,
            name,
            format.into(),
        )?;
    }

    Ok(())
}

/// Export rows from a file or URL to CSV or XLSX
fn cmd_export(
    cfg_dir: &Path,
    input: &str,
    format: FormatArg,
    name: &str,
    columns: Option<Vec<String>>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CarteraError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let catalog = load_columns(cfg_dir)?;
    let rows = source::load_rows(input, &config.source)?;
    let columns = resolve_columns(columns, &rows);

    run_export(cfg_dir, &config, &rows, &columns, &catalog, name, format.into())
}

/// Declared column list wins; otherwise the first row's keys in payload order.
fn resolve_columns(columns: Option<Vec<String>>, rows: &[Row]) -> Vec<String> {
    match columns {
        Some(cols) => cols,
        None => rows
            .first()
            .map(|row| row.keys().map(String::from).collect())
            .unwrap_or_default(),
    }
}

/// Render one page of rows plus the pagination footer.
fn render_page(rows: &[Row], columns: &[String], catalog: &ColumnCatalog, page: usize) {
    if rows.is_empty() {
        println!("No records found.");
        return;
    }

    let pager = Pager::new(rows.len());
    let page = pager.clamp(page);
    let (start, end) = pager.bounds(page);

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| catalog.describe(c).to_string()));
    for row in pager.slice(rows, page) {
        builder.push_record(
            columns
                .iter()
                .map(|c| format_cell(catalog.kind(c), row.get(c).unwrap_or(&Value::Null))),
        );
    }

    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
    println!(
        "Showing {} to {} of {} records (page {} of {})",
        start + 1,
        end,
        pager.total_records(),
        page,
        pager.total_pages()
    );
}

/// Drive an export job to completion, printing progress as it arrives. The
/// file is written only from the terminal step, so a failed job leaves
/// nothing behind.
fn run_export(
    cfg_dir: &Path,
    config: &Config,
    rows: &[Row],
    columns: &[String],
    catalog: &ColumnCatalog,
    name: &str,
    format: ExportFormat,
) -> Result<()> {
    if rows.is_empty() {
        println!("No records to export.");
        return Ok(());
    }

    let mut job = match format {
        ExportFormat::Csv => {
            let delimiter = delimiter_byte(&config.export.delimiter)?;
            ExportJob::csv(rows, columns, catalog, delimiter)
        }
        ExportFormat::Xlsx => ExportJob::xlsx(rows, columns, catalog, &config.export.sheet_name),
    };

    let label = match format {
        ExportFormat::Csv => "CSV",
        ExportFormat::Xlsx => "Excel",
    };

    let mut bytes = None;
    let mut stdout = std::io::stdout();
    for step in &mut job {
        match step? {
            ExportStep::Progress(p) => {
                write!(stdout, "\rGenerating {label}... {p}%")?;
                stdout.flush()?;
            }
            ExportStep::Finished(b) => {
                bytes = Some(b);
            }
        }
    }
    writeln!(stdout, "\rGenerating {label}... 100%")?;

    let bytes = bytes.expect("non-empty export finished without bytes");

    let output_dir = resolve_output_dir(&config.export.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let filename = export_filename(name, format, chrono::Local::now().date_naive());
    let path = output_dir.join(&filename);
    std::fs::write(&path, bytes)?;

    println!("Exported {} record(s)", rows.len());
    println!("  Saved: {}", path.display());

    Ok(())
}

fn delimiter_byte(delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [b] => Ok(*b),
        _ => Err(CarteraError::InvalidDelimiter(delimiter.to_string())),
    }
}
