use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;

use searchvault::api::{AppState, create_router};
use searchvault::config::Config;
use searchvault::db::{Database, SearchRepo};
use searchvault::resolver::SourceResolver;
use searchvault::service::SearchService;
use searchvault::store::{MemoryStore, SearchStore};

#[derive(Parser)]
#[command(name = "searchvault", about = "Search history backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,

        /// Keep searches in process memory instead of MongoDB
        #[arg(long)]
        in_memory: bool,
    },
    /// Ask Gemini for an entity's platform URLs and print them as JSON
    Resolve { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also captures `log` records from the db layer and the mongodb driver.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        in_memory: false,
    }) {
        Command::Serve { port, in_memory } => serve(config, port, in_memory).await,
        Command::Resolve { query } => {
            let links = SourceResolver::from_config(&config)
                .resolve_sources(&query)
                .await?;
            println!("{}", serde_json::to_string_pretty(&links)?);
            Ok(())
        }
    }
}

async fn serve(config: Config, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    let store: Arc<dyn SearchStore> = if in_memory {
        tracing::warn!("using in-memory store; searches are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let db = Database::from_config(&config).await?;
        let repo = SearchRepo::new(&db);
        repo.ensure_indexes().await?;
        Arc::new(repo)
    };

    let resolver = SourceResolver::from_config(&config);
    if !resolver.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/resolve will return 503");
    }

    let state = Arc::new(AppState::new(SearchService::new(store), resolver));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running on port {}", addr.port());

    axum::serve(listener, app).await?;
    Ok(())
}
