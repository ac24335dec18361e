use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::App;
use shelf_kernel::settings::Settings;

/// Book catalog service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry);
            tracing::info!(env = ?settings.environment, "starting shelf server");
            App::from_settings(settings).await?.serve().await
        }
        Command::Migrate => {
            shelf_telemetry::init(&settings.telemetry);
            let app = App::from_settings(settings).await?;
            let applied = app.migrate().await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
