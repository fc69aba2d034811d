//! fastrag CLI: load documents, then answer questions about them
//!
//! Run with: cargo run --bin fastrag -- ask "what is this about?"

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastrag::{config::RagConfig, session::Session};

#[derive(Parser)]
#[command(name = "fastrag", about = "Document Q&A over binary-quantized retrieval")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of documents to load before answering (scanned recursively)
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Extra files to load
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question about the loaded documents
    Ask {
        /// The question to answer
        question: String,
    },
    /// Load documents and report what was ingested, without querying
    Ingest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fastrag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::default(),
    };

    // Fails here when the generation credential is missing, before any
    // document is loaded or query accepted.
    let mut session = Session::from_config(config.clone())?;

    let docs_dir = cli.docs_dir.unwrap_or_else(|| config.ingestion.docs_dir.clone());
    if docs_dir.exists() {
        let outcome = session.load_dir(&docs_dir)?;
        for failure in &outcome.failures {
            tracing::warn!(source = %failure.source.display(), error = %failure.error, "skipped file");
        }
        tracing::info!(
            loaded = outcome.loaded,
            skipped = outcome.failures.len(),
            dir = %docs_dir.display(),
            "directory ingested"
        );
    }

    for path in &cli.files {
        if let Err(error) = session.load_file(path) {
            tracing::warn!(source = %path.display(), %error, "skipped file");
        }
    }

    match cli.command {
        Command::Ingest => {
            println!("Loaded {} documents", session.documents().len());
            for doc in session.documents() {
                println!("  {} ({} chars)", doc.source_name, doc.text.len());
            }
        }
        Command::Ask { question } => {
            let answer = session.query(&question).await?;
            println!("{}", answer);
        }
    }

    Ok(())
}
