//! Start the share server.

use clap::Args;

use livepet_core::config::AppConfig;
use livepet_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Run database migrations on startup
    #[arg(long)]
    pub migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.migrate {
        config.database.run_migrations = true;
    }

    println!("Starting Livepet share server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    livepet_api::run_server(config).await
}
