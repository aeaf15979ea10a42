use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch::{api, DocumentLoader, EngineHandle, LoaderConfig};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory TF-IDF document search", long_about = None)]
struct Args {
    /// Directory holding the documents to index
    #[arg(short, long, global = true, default_value = docsearch::loader::DEFAULT_DOCS_DIR)]
    docs_dir: PathBuf,

    /// File extension to index
    #[arg(short, long, global = true, default_value = docsearch::loader::DEFAULT_EXTENSION)]
    extension: String,

    /// Do not write a welcome document into an empty directory
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank documents against a query and print them
    Search {
        query: String,

        /// Show at most this many results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Print index statistics
    Stats,
}

/// Log subscriber; logs go to stderr so they never mix with printed results
fn build_subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docsearch=info,tower_http=info"));
    tracing::subscriber::set_global_default(build_subscriber(filter))
        .context("Failed to install log subscriber")
}

fn do_search<W: Write>(
    handle: &EngineHandle,
    query: &str,
    limit: Option<usize>,
    out: &mut W,
) -> Result<()> {
    let engine = handle.get().context("Failed to build search index")?;

    let start = Instant::now();
    let results = engine.search(query);
    let duration = start.elapsed();

    tracing::info!(query, "Search query");
    writeln!(out, "Found {} matches in {:?}", results.len(), duration)?;
    writeln!(out)?;

    for result in results.iter().take(limit.unwrap_or(results.len())) {
        writeln!(out, "{} (Score: {:.2})", result.filename, result.score)?;
        writeln!(out, "    {}", result.snippet(120).replace('\n', " "))?;
    }

    Ok(())
}

fn print_stats(handle: &EngineHandle) -> Result<()> {
    let stats = handle.get().context("Failed to build search index")?.stats();

    println!("Documents:          {}", stats.total_documents);
    println!("Distinct terms:     {}", stats.total_terms);
    println!("Postings:           {}", stats.total_postings);
    println!("Avg docs per term:  {:.2}", stats.avg_docs_per_term);

    Ok(())
}

async fn serve(handle: Arc<EngineHandle>, addr: SocketAddr) -> Result<()> {
    // Build eagerly so the first request doesn't pay for it
    let engine = handle.get().context("Failed to build search index")?;
    tracing::info!("Loaded {} documents", engine.document_count());

    let app = api::create_router(handle);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let config = LoaderConfig::new(args.docs_dir)
        .with_extension(&args.extension)
        .with_seed_welcome(!args.no_seed);
    let handle = Arc::new(EngineHandle::new(DocumentLoader::new(config)));

    match args.command {
        Command::Search { query, limit } => {
            do_search(&handle, &query, limit, &mut std::io::stdout().lock())
        }
        Command::Serve { addr } => serve(handle, addr).await,
        Command::Stats => print_stats(&handle),
    }
}
