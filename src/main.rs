use clap::Parser;
use pantry::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    voice::{Recognizer, Speaker},
    Error, Finder, Result,
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
                .unwrap_or_else(|_| "info,pantry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Search { query } => {
            let finder = Finder::load(&settings).await;
            commands::search(&finder, &query).await?;
        }
        Commands::Suggest { text, cursor } => {
            let finder = Finder::load(&settings).await;
            commands::suggest(&finder, &text, cursor)?;
        }
        Commands::Instructions {
            query,
            number,
            speak,
        } => {
            let finder = Finder::load(&settings).await;
            let speaker = Speaker::from_config(&settings.voice)?;
            commands::instructions(&finder, &speaker, &settings.voice, &query, number, speak)
                .await?;
        }
        Commands::Listen => {
            let finder = Finder::load(&settings).await;
            let recognizer = Recognizer::from_config(&settings.voice)?;
            commands::listen(&finder, &recognizer).await?;
        }
        Commands::Validate { source } => {
            commands::validate(&settings, source).await?;
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

    info!("Starting Pantry server");
    info!("Recipe source: {}", settings.source.location);

    // A failed load still serves the page, which shows the status message
    let finder = Finder::load(&settings).await;

    let state = AppState::new(finder, settings.clone())?;
    info!(
        "Speech output: {}, speech recognition: {}",
        if state.speaker.is_supported() { "on" } else { "off" },
        if state.recognizer.is_supported() { "on" } else { "off" },
    );

    let app = routes::create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Pantry");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  GET  /api/search?q=");
    println!("  GET  /api/suggest?text=&cursor=");
    println!("  POST /api/suggest/commit");
    println!("  GET  /api/results/:index/instructions");
    println!("  POST /api/voice/listen");
    println!("  POST /api/clear");
    println!("  GET  /api/status");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
