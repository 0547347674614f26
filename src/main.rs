// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use event_impact::{build_dashboard, event_listing, init_tracing, resolve_event, DataArgs, DataContext, DataPaths};

/// GDP and housing trajectories around major global events
#[derive(Debug, Parser)]
#[command(name = "event-impact", version, about)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// List the selectable events
    Events,
    /// Print one event's dashboard as JSON
    Show {
        /// Event key, e.g. covid-19
        event: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Events => run_events(),
        Command::Show { event } => run_show(cli.data.into(), &event)?,
        Command::Tui => run_ui_mode(cli.data.into())?,
    }

    Ok(())
}

fn run_events() {
    print!("{}", event_listing());
}

fn run_show(paths: DataPaths, key: &str) -> Result<()> {
    // Checked before loading so a typo fails fast
    let event = resolve_event(key)?;

    let ctx = DataContext::load(&paths)?;
    let dashboard = build_dashboard(&ctx, event);

    let json = serde_json::to_string_pretty(&dashboard).context("Failed to serialize dashboard")?;
    println!("{}", json);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(paths: DataPaths) -> Result<()> {
    println!("🌍 Loading datasets...");

    // Fatal before any screen is drawn
    let ctx = DataContext::load(&paths)?;

    println!("✓ Loaded {} GDP records and {} housing records", ctx.gdp().len(), ctx.housing().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(&ctx);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_paths: DataPaths) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin event-impact-server --features server");
    std::process::exit(1);
}
