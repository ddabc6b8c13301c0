//! Sheetview CLI - Render published spreadsheets into display tables
//!
//! # Main Commands
//!
//! ```bash
//! sheetview serve --config configs/results.json       # Start HTTP server (port 3000)
//! sheetview render --config configs/ledger.json       # Fetch and render every view
//! sheetview lookup --config configs/results.json --key 101
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! sheetview parse input.csv                          # Just parse CSV to JSON
//! sheetview render -c configs/ledger.json -i sheet.csv -v table4 -f csv
//! sheetview check-config configs/ledger.json         # Validate a config file
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use sheetview::api::logs::LOG_BROADCASTER;
use sheetview::lookup::lookup;
use sheetview::transform::pipeline::RECORD_NOT_FOUND_MESSAGE;
use sheetview::{
    load_record, load_view, load_views, parse_csv_file, render_view_by_id, render_views, to_csv,
    AppConfig, ConfigError, DisplayTable, RecordSource, SheetClient,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetview")]
#[command(about = "Render published spreadsheet CSV into display tables", long_about = None)]
struct Cli {
    /// Do not echo pipeline logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output the grid as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render views from a local CSV file or the configured sheet
    Render {
        /// View configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Local CSV file instead of fetching tableUrl
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Render only this view
        #[arg(short, long)]
        view: Option<String>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up one detail record by key
    Lookup {
        /// View configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Record key, e.g. a roll number
        #[arg(short, long)]
        key: String,

        /// Local CSV file instead of fetching recordUrl
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Validate a configuration file
    CheckConfig {
        config: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// View configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    LOG_BROADCASTER.set_echo(!cli.quiet);

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Render {
            config,
            input,
            view,
            format,
            output,
        } => {
            cmd_render(
                &config,
                input.as_deref(),
                view.as_deref(),
                format,
                output.as_deref(),
            )
            .await
        }

        Commands::Lookup { config, key, input } => cmd_lookup(&config, &key, input.as_deref()).await,

        Commands::CheckConfig { config } => cmd_check_config(&config),

        Commands::Serve { config, port } => cmd_serve(&config, port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let grid = parse_csv_file(input)?;
    let width = grid.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    eprintln!("✅ Parsed {} rows, up to {} columns", grid.len(), width);

    let json = serde_json::to_string_pretty(&grid.to_records())?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_render(
    config_path: &Path,
    input: Option<&Path>,
    view: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path)?;

    let tables: Vec<DisplayTable> = match input {
        Some(path) => {
            eprintln!("📄 Rendering from: {}", path.display());
            let grid = parse_csv_file(path)?;
            match view {
                Some(id) => vec![render_view_by_id(&grid, &config, id)?],
                None => render_views(&grid, &config),
            }
        }
        None => {
            let client = SheetClient::new();
            match view {
                Some(id) => vec![load_view(&client, &config, id).await?],
                None => load_views(&client, &config).await?,
            }
        }
    };

    let content = match format {
        OutputFormat::Json => match tables.as_slice() {
            [single] if view.is_some() => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(&tables)?,
        },
        OutputFormat::Csv => {
            let mut parts = Vec::with_capacity(tables.len());
            for table in &tables {
                parts.push(to_csv(table)?);
            }
            parts.join("\n")
        }
    };
    write_output(&content, output)?;

    eprintln!("✨ Rendered {} view(s)", tables.len());
    Ok(())
}

async fn cmd_lookup(
    config_path: &Path,
    key: &str,
    input: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path)?;

    let record = match input {
        Some(path) => {
            let mapping = config
                .record
                .as_ref()
                .ok_or_else(|| ConfigError::Invalid("no record mapping configured".to_string()))?;
            let source = RecordSource::from_config(parse_csv_file(path)?, mapping);
            lookup(&source, mapping, key)
        }
        None => load_record(&SheetClient::new(), &config, key).await?,
    };

    match record {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => {
            eprintln!("❌ {} ({})", RECORD_NOT_FOUND_MESSAGE, key);
            std::process::exit(1);
        }
    }
}

fn cmd_check_config(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Checking: {}", config_path.display());

    match AppConfig::from_file(config_path) {
        Ok(config) => {
            for view in &config.views {
                eprintln!(
                    "   {} rows {}..{}, {} columns, {} style rule(s)",
                    view.id,
                    view.row_start,
                    view.row_end,
                    view.columns.len(),
                    view.styles.len()
                );
            }
            if let Some(record) = &config.record {
                eprintln!("   record: key column {}, {} fields", record.key_column, record.fields.len());
            }
            eprintln!("✅ {} views valid", config.views.len());
            Ok(())
        }
        Err(ConfigError::Schema { errors }) => {
            for err in errors.iter().take(10) {
                eprintln!("   - {}", err);
            }
            Err(format!("{} schema error(s)", errors.len()).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_serve(config_path: &Path, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path)?;
    sheetview::server::start_server(config, port).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("   💾 Saved to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
