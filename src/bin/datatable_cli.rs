//! CLI tool for datatable - imports, renders and formats tables
//!
//! Usage:
//!   datatable_cli import-csv <input.csv>              # Table JSON to stdout
//!   datatable_cli import-html <input.html> -o t.json  # Table JSON to file
//!   datatable_cli render <table.json> --class wide    # Table markup
//!   datatable_cli format currency 1234.5              # $1,234.50
//!
//! Set `RUST_LOG=debug` for import/render diagnostics on stderr.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use datatable::{
    format_value, import_csv, import_html, render_table, ColumnType, DataTableError, ImportedTable,
    Table, TableId,
};

#[derive(Parser)]
#[command(name = "datatable_cli")]
#[command(about = "Import, render and format data tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a CSV file and print the table as JSON
    ImportCsv {
        /// CSV file (header row + data rows)
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import the first <table> of an HTML file and print it as JSON
    ImportHtml {
        /// HTML file or fragment
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a table JSON file ({columns, rows, options}) to HTML
    Render {
        /// Table JSON, as written by the import commands
        input: PathBuf,
        /// Extra CSS class for the table element
        #[arg(long)]
        class: Option<String>,
        /// Value of the data-table-id attribute
        #[arg(long, default_value_t = 0)]
        id: u64,
        /// Write markup here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Format one value the way a table cell would show it
    Format {
        /// Column type: text, number, currency, percent, link, image, html
        col_type: String,
        /// Raw value
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Error reading {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Error writing {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Error parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: DataTableError,
    },
    #[error("Error serializing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Error writing output: {0}")]
    Stdout(#[from] io::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, text).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn emit_import(
    input: &Path,
    output: Option<&Path>,
    import: fn(&str) -> datatable::Result<ImportedTable>,
) -> Result<(), CliError> {
    let text = read(input)?;
    let imported = import(&text).map_err(|source| CliError::Parse {
        path: input.to_path_buf(),
        source,
    })?;
    eprintln!("{}", imported.summary());
    let json = serde_json::to_string_pretty(&imported.into_table())?;
    emit(&json, output)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::ImportCsv { input, output } => emit_import(&input, output.as_deref(), import_csv),
        Command::ImportHtml { input, output } => emit_import(&input, output.as_deref(), import_html),
        Command::Render {
            input,
            class,
            id,
            output,
        } => {
            let text = read(&input)?;
            let table: Table = serde_json::from_str(&text).map_err(|e| CliError::Parse {
                path: input.clone(),
                source: e.into(),
            })?;
            let rendered = render_table(
                &table.columns,
                &table.rows,
                &table.options,
                TableId(id),
                class.as_deref(),
            );
            emit(&rendered.to_html(), output.as_deref())
        }
        Command::Format { col_type, value } => {
            let col_type: ColumnType = col_type.parse().unwrap_or_default();
            emit(&format_value(&value, col_type).html, None)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
