//! CLI command definitions and dispatch.

pub mod migrate;
pub mod serve;
pub mod shares;
pub mod token;

use clap::{Parser, Subcommand};

use livepet_core::config::AppConfig;
use livepet_core::error::AppError;

use crate::output::OutputFormat;

/// Livepet health profile sharing administration
#[derive(Debug, Parser)]
#[command(name = "livepet", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from config/{env}.toml
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the share server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Development bearer tokens
    Token(token::TokenArgs),
    /// Inspect and revoke health profile shares
    Shares(shares::SharesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Shares(args) => shares::execute(args, &config, self.format).await,
        }
    }
}
