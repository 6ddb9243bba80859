#![doc = include_str!("../README.md")]

mod client;
mod session;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use client::{AuthorityClient, RemoteCounterSource};
use seqtag::{ColumnSpec, CounterSource, LocalCounterSource, PrintOptions, RowSet};
use session::Session;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "seqtag",
    version,
    about = "Allocate unique identifiers for tabular data and build barcode artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one allocation session over a tabular file.
    Generate(GenerateArgs),
    /// Print the authority's current counter value.
    Sequence {
        /// Base URL of the sequence authority.
        ///
        /// Environment variable: `AUTHORITY_URL`
        #[arg(long, env = "AUTHORITY_URL", default_value_t = String::from("http://127.0.0.1:8080"))]
        authority: String,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input file: `.csv` with a header row, or `.json` array of objects.
    input: PathBuf,

    /// Column holding the primary per-row value (FSN).
    #[arg(long)]
    column: String,

    /// Optional column printed as the label above each symbol.
    #[arg(long)]
    label_column: Option<String>,

    /// Base URL of the sequence authority.
    ///
    /// Environment variable: `AUTHORITY_URL`
    #[arg(long, env = "AUTHORITY_URL", default_value_t = String::from("http://127.0.0.1:8080"))]
    authority: String,

    /// Allocate from a local counter without contacting the authority.
    ///
    /// Batch-local uniqueness is still guaranteed; cross-session
    /// uniqueness is not.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Counter seed for `--offline` mode.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write the printable document here.
    #[arg(long)]
    print_out: Option<PathBuf>,

    /// Write the reconciliation export here.
    #[arg(long)]
    export_out: Option<PathBuf>,

    /// Submit the allocated batch to the authority.
    #[arg(long, default_value_t = false)]
    submit: bool,

    /// Also print records that carry no label.
    #[arg(long, default_value_t = false)]
    no_require_label: bool,
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    init_telemetry();

    match Cli::parse().command {
        Command::Generate(args) => run_generate(args),
        Command::Sequence { authority } => {
            let client = AuthorityClient::new(authority)?;
            let value = client.fetch_sequence()?;
            println!("{value}");
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let rows = load_rows(&args.input)?;
    let columns = ColumnSpec::new(args.column.clone(), args.label_column.clone());
    let options = PrintOptions {
        require_label: !args.no_require_label,
        ..PrintOptions::default()
    };

    if args.offline {
        anyhow::ensure!(!args.submit, "--submit requires an authority; drop --offline");
        let mut session = Session::new(LocalCounterSource::seeded(args.seed), options);
        let size = session.generate(&rows, columns)?;
        tracing::info!(
            "allocated {size} identifiers locally (counter now {})",
            session.counter()
        );
        emit_artifacts(&session, &args)
    } else {
        let client = AuthorityClient::new(args.authority.clone())?;
        let mut source = RemoteCounterSource::new(client);
        // Counter fetch precedes allocation for every generate action.
        let fetched = source.refresh();
        tracing::debug!("authority counter at {fetched}");

        let mut session = Session::new(source, options);
        let size = session.generate(&rows, columns)?;
        tracing::info!(
            "allocated {size} identifiers (counter now {})",
            session.counter()
        );
        emit_artifacts(&session, &args)?;

        if args.submit {
            session.submit()?;
            tracing::info!(
                "batch persisted; authority counter at {}",
                session.counter()
            );
        }
        Ok(())
    }
}

fn emit_artifacts<C: CounterSource>(
    session: &Session<C>,
    args: &GenerateArgs,
) -> anyhow::Result<()> {
    if let Some(path) = &args.print_out {
        let document = session.print_document()?;
        std::fs::write(path, document)
            .with_context(|| format!("writing print document to {}", path.display()))?;
        tracing::info!("wrote print document to {}", path.display());
    }
    if let Some(path) = &args.export_out {
        let export = session.export_document()?;
        std::fs::write(path, export)
            .with_context(|| format!("writing export to {}", path.display()))?;
        tracing::info!("wrote export to {}", path.display());
    }
    Ok(())
}

fn load_rows(path: &Path) -> anyhow::Result<RowSet> {
    let file =
        File::open(path).with_context(|| format!("opening input {}", path.display()))?;
    let rows = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => RowSet::from_json_reader(file)?,
        _ => RowSet::from_csv_reader(file)?,
    };
    tracing::debug!(
        "loaded {} rows with columns {:?}",
        rows.len(),
        rows.columns()
    );
    Ok(rows)
}

fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
