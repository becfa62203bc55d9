use clap::Parser;
use ricettario::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    pipeline::Pipeline,
    Error, Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ricettario=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Ask { question, dry_run } => {
            settings.validate()?;
            let pipeline = Pipeline::initialize(&settings).await?;
            commands::ask(&pipeline, &question, dry_run).await?;
        }
        Commands::Retrieve { question, k } => {
            settings.validate()?;
            let pipeline = Pipeline::initialize(&settings).await?;
            commands::retrieve(&pipeline, &question, k).await?;
        }
        Commands::Check => {
            commands::check(&settings)?;
        }
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }
    settings.validate()?;

    info!("Starting Ricettario server");
    info!("Corpus: {}", settings.corpus.path.display());

    // The index is fully built before the listener accepts anything
    let pipeline = Pipeline::initialize(&settings).await?;
    let status = pipeline.status();

    let app = routes::create_router(AppState { pipeline }, &settings.server);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Ricettario Server");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("Recipes indexed: {}", status.documents);
    println!("Embedding model: {}", status.embedding_model);
    println!("Generation model: {}", status.generation_model);
    println!("\nAPI Endpoints:");
    println!("  POST /api/answer");
    println!("  POST /api/retrieve");
    println!("  GET  /api/health");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
