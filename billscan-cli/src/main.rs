use anyhow::{Context, Result, bail};
use billscan_ingest::{
    DocumentKind, ExtractOptions, ImportSummary, PlainTextSource, TransactionSink,
    extract_document, parse_bulk_payload, respond,
};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod output;
mod state;

use config::{Config, OutputFormat};
use state::JsonlStore;

#[derive(Parser, Debug)]
#[command(name = "billscan", version, about = "Extract transactions from receipt and statement text")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.billscan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ImportArgs {
    /// Document to read, `-` for stdin
    file: PathBuf,

    /// MIME type of the document (guessed from the extension when omitted)
    #[arg(long)]
    mime: Option<String>,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Append extracted records to ~/.billscan/transactions.jsonl
    #[arg(long)]
    save: bool,

    /// Owner tag for saved records (overrides config)
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from sectioned receipt text (Date/Description/Category/Amount)
    Receipt {
        #[command(flatten)]
        args: ImportArgs,
    },

    /// Extract transactions from statement text (one row per transaction)
    Statement {
        #[command(flatten)]
        args: ImportArgs,

        /// Currency symbol that precedes amounts (overrides config)
        #[arg(long)]
        currency: Option<String>,

        /// Characters kept after each date when re-segmenting (overrides config)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Normalize a JSON array of transactions (e.g. model output)
    Bulk {
        #[command(flatten)]
        args: ImportArgs,
    },

    /// Manage ~/.billscan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr).compact())
        .init();

    let cfg = match &cli.config {
        Some(p) => config::load_config_from(p)?,
        None => config::load_config()?,
    };

    match cli.command {
        Command::Receipt { args } => {
            run_import(Some(DocumentKind::Receipt), &args, &cfg, &cfg.extract)?;
        }

        Command::Statement {
            args,
            currency,
            window,
        } => {
            let mut options = cfg.extract.clone();
            if let Some(symbol) = currency {
                options.currency_symbol = symbol;
            }
            if let Some(window) = window {
                options.fallback_window = window;
            }
            run_import(Some(DocumentKind::Statement), &args, &cfg, &options)?;
        }

        Command::Bulk { args } => {
            run_import(None, &args, &cfg, &cfg.extract)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn read_input(file: &Path) -> Result<Vec<u8>> {
    if file == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("read stdin")?;
        return Ok(buf);
    }
    std::fs::read(file).with_context(|| format!("read {}", file.display()))
}

fn guess_mime(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => "text/plain",
    }
}

/// `kind` is `None` for bulk JSON payloads.
fn run_import(
    kind: Option<DocumentKind>,
    args: &ImportArgs,
    cfg: &Config,
    options: &ExtractOptions,
) -> Result<()> {
    let bytes = read_input(&args.file)?;

    let result = match kind {
        Some(kind) => {
            let mime = args
                .mime
                .clone()
                .unwrap_or_else(|| guess_mime(&args.file).to_string());
            info!(file = %args.file.display(), %mime, ?kind, "extracting");
            extract_document(kind, &bytes, &mime, &PlainTextSource, options)
        }
        None => {
            let text = String::from_utf8(bytes).context("bulk payload is not UTF-8")?;
            parse_bulk_payload(&text)
        }
    };

    let summary: ImportSummary = match respond(kind, result) {
        Ok(summary) => summary,
        Err(body) => {
            error!(status = body.status, key = body.error, "{}", body.message);
            bail!("{} ({})", body.message, body.error);
        }
    };

    if args.save {
        let owner = args.owner.as_deref().unwrap_or(&cfg.store.owner);
        let mut store = JsonlStore::new(state::transactions_path()?);
        let saved = store.insert_many(owner, &summary.transactions)?;
        info!(saved, owner, path = %store.path().display(), "records saved");
    }

    let format = args.format.unwrap_or(cfg.output.format);
    output::render(io::stdout().lock(), &summary, format, cfg.output.pretty)
}
