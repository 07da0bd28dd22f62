//! citegraph - citation network builder for literature reviews
//!
//! Merges bibliographic exports from several databases into one
//! deduplicated corpus, looks up who cites whom, and writes the resulting
//! citation graph as tables.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "citegraph")]
#[command(about = "Citation network builder for literature reviews")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./citegraph.toml or the user config directory)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Concatenate per-database exports into one raw table
    Combine(cmd::combine::CombineArgs),
    /// Merge duplicates into the canonical corpus
    Dedup(cmd::dedup::DedupArgs),
    /// Look up citations and references for every corpus record
    Resolve(cmd::resolve::ResolveArgs),
    /// Build the citation graph tables
    Graph(cmd::graph::GraphArgs),
    /// Run dedup, resolve and graph in sequence
    Run(cmd::run::RunArgs),
    /// Show stage manifests of an output directory
    Status(cmd::status::StatusArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let progress = Arc::new(citegraph_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug; progress bars show activity
    //   non-TTY: info unless --debug; logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    citegraph_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    citegraph_core::set_http_config(citegraph_core::HttpConfig {
        timeout: std::time::Duration::from_secs(
            cli.timeout.unwrap_or(config.resolve.timeout_secs),
        ),
        ..Default::default()
    });

    match cli.command {
        Command::Combine(args) => cmd::combine::run(args, &config, &progress)?,
        Command::Dedup(args) => cmd::dedup::run(args, &config, &progress)?,
        Command::Resolve(args) => {
            let summary = cmd::resolve::run(args, &config, &progress)?;
            if summary.interrupted {
                return Ok(ExitCode::from(130));
            }
        }
        Command::Graph(args) => cmd::graph::run(args, &config, &progress)?,
        Command::Run(args) => return cmd::run::run(args, &config, &progress),
        Command::Status(args) => cmd::status::run(args, &config)?,
        Command::Config => print_config(&config),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        "Output directory",
        &config.output.default_dir.display().to_string(),
    ]);
    table.add_row(vec!["API URL", &config.resolve.api_url]);
    table.add_row(vec![
        "API key",
        if config.resolve.api_key.is_some() {
            "configured"
        } else {
            "not set"
        },
    ]);
    table.add_row(vec![
        "Delay between lookups",
        &format!("{}ms", config.resolve.delay_ms),
    ]);
    table.add_row(vec![
        "Request timeout",
        &format!("{}s", config.resolve.timeout_secs),
    ]);
    table.add_row(vec!["Node scope", config.graph.scope.name()]);
    table.add_row(vec![
        "Citation matrix",
        if config.graph.write_matrix { "yes" } else { "no" },
    ]);

    eprintln!("\n{table}");
}
