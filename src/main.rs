use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the welhome properties service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if one exists.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            let mut settings = match &args.config {
                Some(name) => configuration::load_settings_from(name)?,
                None => configuration::load_settings()?,
            };
            if let Some(host) = args.host {
                settings.http.host = host;
            }
            if let Some(port) = args.port {
                settings.http.port = port;
            }
            web_server::run_server(settings).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small HTTP API for managing property listings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the bind address (e.g. "0.0.0.0").
    #[arg(long)]
    host: Option<String>,

    /// Override the port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Read settings from this config file instead of "welhome.toml".
    #[arg(long)]
    config: Option<String>,
}
