//! # Docforge CLI
//!
//! Command-line interface for the Docforge ingestion pipeline.
//!
//! ## Usage
//!
//! ```bash
//! docforge --config ./config/docforge.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docforge init` | Create the SQLite database and run schema migrations |
//! | `docforge ingest <file.pdf>` | Ingest a PDF: extract, chunk, embed, persist |
//! | `docforge status <id>` | Show one document record |
//! | `docforge list` | List documents, newest first |
//! | `docforge rename <id> <name>` | Update a document's display name |
//! | `docforge delete <id>` | Delete a document and its chunks |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docforge::config::{self, Config};
use docforge::embedding::create_embedder;
use docforge::extract::PdfExtractor;
use docforge::sqlite_store::SqliteStore;
use docforge::upload::validate_upload;
use docforge::worker::{spawn_workers, IngestJob};
use docforge::{db, migrate};

use docforge_core::models::{Document, NewDocument};
use docforge_core::pipeline::{IngestPipeline, PipelineConfig};
use docforge_core::store::DocumentStore;

/// How often the ingest command polls for a status transition.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Docforge: a PDF document ingestion pipeline for retrieval-augmented
/// assistants.
#[derive(Parser)]
#[command(
    name = "docforge",
    about = "PDF ingestion pipeline: extract, chunk, embed, persist",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents and
    /// document_chunks tables. Idempotent.
    Init,

    /// Ingest a PDF document.
    ///
    /// Validates the upload, creates the document record in `processing`
    /// state, hands it to the background workers, and polls until the
    /// status becomes `ready` or `error`.
    Ingest {
        /// Path to the PDF file.
        file: PathBuf,

        /// Display name. Defaults to the file stem.
        #[arg(long)]
        name: Option<String>,

        /// Owner id recorded on the document and its chunks.
        #[arg(long, default_value = "local")]
        owner: String,
    },

    /// Show one document record.
    Status {
        /// Document id.
        id: String,
    },

    /// List documents, newest first.
    List {
        /// Owner id to list documents for.
        #[arg(long, default_value = "local")]
        owner: String,
    },

    /// Update a document's display name.
    Rename {
        /// Document id.
        id: String,
        /// New display name.
        name: String,
    },

    /// Delete a document and all of its chunks.
    Delete {
        /// Document id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => cmd_init(&config).await,
        Commands::Ingest { file, name, owner } => cmd_ingest(&config, file, name, owner).await,
        Commands::Status { id } => cmd_status(&config, &id).await,
        Commands::List { owner } => cmd_list(&config, &owner).await,
        Commands::Rename { id, name } => cmd_rename(&config, &id, &name).await,
        Commands::Delete { id } => cmd_delete(&config, &id).await,
    }
}

async fn cmd_init(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    pool.close().await;
    println!("initialized {}", config.db.path.display());
    Ok(())
}

async fn cmd_ingest(
    config: &Config,
    file: PathBuf,
    name: Option<String>,
    owner: String,
) -> Result<()> {
    // Upload validation happens before any record is created.
    let size = std::fs::metadata(&file)
        .with_context(|| format!("failed to read {}", file.display()))?
        .len();
    validate_upload(&file, size, &config.ingest)?;

    let bytes = std::fs::read(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let name = name.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    });

    let pool = db::connect(&config.db.path).await?;
    let store = Arc::new(SqliteStore::new(pool));
    let embedder = create_embedder(&config.embedding)?;

    let pipeline = Arc::new(IngestPipeline::new(
        Arc::new(PdfExtractor),
        embedder,
        store.clone(),
        store.clone(),
        PipelineConfig {
            target_tokens: config.chunking.target_tokens,
            overlap_tokens: config.chunking.overlap_tokens,
        },
    ));
    let (queue, workers) = spawn_workers(pipeline, config.ingest.workers, config.ingest.queue_depth);

    let document_id = store
        .create_document(&NewDocument {
            owner_id: owner.clone(),
            name,
            file_path: file.display().to_string(),
            file_size: bytes.len() as i64,
        })
        .await?;
    println!("created document {} (processing)", document_id);

    queue
        .submit(IngestJob {
            document_id: document_id.clone(),
            owner_id: owner,
            bytes,
        })
        .await?;
    drop(queue);

    // The pipeline reports completion only through the document record.
    let document = loop {
        let document = store
            .get_document(&document_id)
            .await?
            .context("document record disappeared while processing")?;
        if document.status.is_terminal() {
            break document;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    workers.join().await;
    print_document(&document);
    Ok(())
}

async fn cmd_status(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    let store = SqliteStore::new(pool);

    match store.get_document(id).await? {
        Some(document) => print_document(&document),
        None => println!("document {} not found", id),
    }
    Ok(())
}

async fn cmd_list(config: &Config, owner: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    let store = SqliteStore::new(pool);

    let documents = store.list_documents(owner).await?;
    if documents.is_empty() {
        println!("no documents for owner {}", owner);
        return Ok(());
    }
    for document in documents {
        println!(
            "{}  {:<10}  {:>4} pages  {}",
            document.id, document.status, document.page_count, document.name
        );
    }
    Ok(())
}

async fn cmd_rename(config: &Config, id: &str, name: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    let store = SqliteStore::new(pool);

    if store.get_document(id).await?.is_none() {
        bail!("document {} not found", id);
    }
    store.rename_document(id, name).await?;
    println!("renamed {} to {}", id, name);
    Ok(())
}

async fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    let store = SqliteStore::new(pool);

    if store.get_document(id).await?.is_none() {
        bail!("document {} not found", id);
    }
    store.delete_document(id).await?;
    println!("deleted {}", id);
    Ok(())
}

fn print_document(document: &Document) {
    println!("id:         {}", document.id);
    println!("name:       {}", document.name);
    println!("owner:      {}", document.owner_id);
    println!("status:     {}", document.status);
    println!("pages:      {}", document.page_count);
    println!("size:       {} bytes", document.file_size);
    if let Some(message) = &document.error_message {
        println!("error:      {}", message);
    }
}
