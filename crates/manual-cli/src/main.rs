//! manual - Command-line interface for chunking and ingesting manuals.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use manual_chunk::ManualChunker;
use manual_core::{ChunkMetadata, ManualConfig, ManualError, Result, SectionHeadings};
use manual_ingest::{IngestPipeline, JsonlSink, MockEmbedder};

/// manual - Prepare arcade equipment manuals for retrieval
#[derive(Parser)]
#[command(name = "manual")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: user config dir, then ./manual-rag.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages detected in a markdown manual
    Pages {
        /// Extracted markdown file
        path: PathBuf,
    },

    /// Print the chunks of a manual as JSON
    Chunk {
        /// Extracted markdown file
        path: PathBuf,

        /// Identifier of the manual
        #[arg(short, long)]
        manual_id: String,

        /// JSON object mapping page numbers to section headings
        #[arg(long)]
        headings: Option<PathBuf>,

        /// Chunk the whole file as one page of plain text
        #[arg(long)]
        plain: bool,
    },

    /// Chunk, embed and append a manual to a JSONL file
    Ingest {
        /// Extracted markdown file
        path: PathBuf,

        /// Identifier of the manual
        #[arg(short, long)]
        manual_id: String,

        /// Output JSONL file
        #[arg(short, long)]
        out: PathBuf,

        /// JSON object mapping page numbers to section headings
        #[arg(long)]
        headings: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> Result<ManualConfig> {
    match path {
        Some(path) => ManualConfig::load(path),
        None => ManualConfig::load_default(),
    }
}

fn load_headings(path: Option<&Path>) -> Result<SectionHeadings> {
    let Some(path) = path else {
        return Ok(SectionHeadings::new());
    };
    let content = fs::read_to_string(path)?;
    let headings: SectionHeadings = serde_json::from_str(&content)?;
    Ok(headings)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error [{}]: {}", e.error_code(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Pages { path } => pages(&config, &path),
        Commands::Chunk {
            path,
            manual_id,
            headings,
            plain,
        } => chunk(&config, &path, &manual_id, headings.as_deref(), plain),
        Commands::Ingest {
            path,
            manual_id,
            out,
            headings,
        } => ingest(&config, &path, &manual_id, &out, headings.as_deref()).await,
    }
}

fn pages(config: &ManualConfig, path: &Path) -> Result<()> {
    let markdown = fs::read_to_string(path)?;
    let chunker = ManualChunker::from_config(config)?;

    let pages = chunker.pages(&markdown);
    if pages.is_empty() {
        println!("No pages found in {}", path.display());
        return Ok(());
    }

    for page in &pages {
        println!("Page {:>4}  {:>7} chars", page.number, page.text.chars().count());
    }
    println!("\n{} page(s)", pages.len());
    Ok(())
}

fn chunk(
    config: &ManualConfig,
    path: &Path,
    manual_id: &str,
    headings: Option<&Path>,
    plain: bool,
) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let headings = load_headings(headings)?;
    let chunker = ManualChunker::from_config(config)?;

    let chunks = if plain {
        let mut metadata = ChunkMetadata::for_page(manual_id, 1);
        metadata.section_heading = headings.get(&1).cloned();
        chunker.chunk_text(&text, &metadata)
    } else {
        chunker.chunk_manual(&text, manual_id, &headings)
    };

    println!("{}", serde_json::to_string_pretty(&chunks)?);
    Ok(())
}

async fn ingest(
    config: &ManualConfig,
    path: &Path,
    manual_id: &str,
    out: &Path,
    headings: Option<&Path>,
) -> Result<()> {
    let markdown = fs::read_to_string(path)?;
    let headings = load_headings(headings)?;

    let embedder = Arc::new(MockEmbedder::with_dimension(config.embedding.dimension));
    let sink = Arc::new(JsonlSink::new(out));
    let pipeline = IngestPipeline::new(config, embedder, sink)?;

    let report = pipeline.ingest_markdown(manual_id, &markdown, &headings).await?;
    if report.chunks == 0 {
        return Err(ManualError::invalid_argument(format!(
            "{} produced no chunks",
            path.display()
        )));
    }

    println!(
        "Ingested '{}': {} page(s), {} chunk(s) -> {}",
        report.manual_id,
        report.pages,
        report.chunks,
        out.display()
    );
    Ok(())
}
