//! sqldag CLI - Scan SQL projects and serve the lineage diagram
//!
//! Usage:
//!   sqldag scan <folder> [--dialect <dialect>] [--discovery]
//!   sqldag serve <folder> [--port <port>] [--no-open]
//!
//! Examples:
//!   sqldag scan ./warehouse/sql --dialect bigquery
//!   sqldag scan ./warehouse/sql --discovery --output json
//!   sqldag serve ./warehouse/sql --port 8000

use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "ui")]
use sqldag::config::Settings;
use sqldag::dialect::Dialect;
use sqldag::scan::{scan_project, ScanOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqldag")]
#[command(about = "sqldag - Interactive lineage graph visualizer for SQL data assets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder of SQL files and print the lineage graph
    Scan {
        /// Folder containing the .sql files
        folder: PathBuf,

        /// SQL dialect used for reference extraction
        #[arg(short, long, default_value = "bigquery")]
        dialect: DialectArg,

        /// Emit ghost nodes for referenced-but-missing files
        #[arg(long)]
        discovery: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Serve the diagram backend for a folder
    #[cfg(feature = "ui")]
    Serve {
        /// Folder containing the .sql files
        folder: PathBuf,

        /// Port to bind on localhost (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open the browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Bigquery,
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
    Snowflake,
    Redshift,
    Databricks,
    Generic,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Bigquery => Dialect::BigQuery,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Snowflake => Dialect::Snowflake,
            DialectArg::Redshift => Dialect::Redshift,
            DialectArg::Databricks => Dialect::Databricks,
            DialectArg::Generic => Dialect::Generic,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable node and edge listing
    Text,
    /// The raw graph payload as JSON
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            folder,
            dialect,
            discovery,
            output,
        } => cmd_scan(folder, dialect, discovery, output),
        #[cfg(feature = "ui")]
        Commands::Serve {
            folder,
            port,
            no_open,
        } => cmd_serve(folder, port, no_open),
    }
}

fn cmd_scan(folder: PathBuf, dialect: DialectArg, discovery: bool, output: OutputFormat) -> ExitCode {
    let options = ScanOptions {
        dialect: dialect.into(),
        discovery,
        subfolders: None,
    };

    let (nodes, edges) = match scan_project(&folder, &options) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Scan error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "nodes": nodes, "edges": edges });
            match serde_json::to_string_pretty(&payload) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Encoding error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        OutputFormat::Text => {
            println!("Folder: {}", folder.display());
            println!();
            println!("Assets ({}):", nodes.len());
            for node in &nodes {
                println!(
                    "  - {} [{}] ({} direct, {} total upstream)",
                    node.id, node.layer, node.incoming_count, node.nested_count
                );
            }
            println!();
            println!("Dependencies ({}):", edges.len());
            for edge in &edges {
                println!("  - {} -> {}", edge.source, edge.target);
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(feature = "ui")]
fn cmd_serve(folder: PathBuf, port: Option<u16>, no_open: bool) -> ExitCode {
    if !folder.is_dir() {
        eprintln!("Not a directory: {}", folder.display());
        return ExitCode::FAILURE;
    }

    let mut settings = Settings::load().unwrap_or_default();
    if let Some(port) = port {
        settings.server.port = port;
    }
    if no_open {
        settings.server.open_browser = false;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(sqldag::web::serve(folder, &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
