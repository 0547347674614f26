// Event Impact Dashboard - Web Server
// Serves the dashboard page and its JSON API with Axum

use anyhow::{Context, Result};
use clap::Parser;
use event_impact::server::{router, AppState};
use event_impact::{init_tracing, DataArgs, DataContext, DataPaths};

/// HTTP front end for the event impact dashboard
#[derive(Debug, Parser)]
#[command(name = "event-impact-server", version, about)]
struct ServerArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_tracing();

    println!("🌐 Event Impact Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Missing or malformed data stops us before we bind
    let paths: DataPaths = args.data.into();
    let ctx = DataContext::load(&paths)?;
    println!("✓ Datasets loaded: {} / {}", paths.gdp.display(), paths.housing.display());

    let app = router(AppState::new(ctx));

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", args.addr))?;

    println!("\n🚀 Server running on http://{}", args.addr);
    println!("   API: /api/events");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
