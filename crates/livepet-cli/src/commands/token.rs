//! Development bearer tokens for owner routes.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use livepet_auth::JwtEncoder;
use livepet_core::config::AppConfig;
use livepet_core::error::AppError;
use livepet_core::types::UserId;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Sign an access token for an owner
    Issue {
        /// Owner user ID
        #[arg(long)]
        user_id: UserId,
        /// Owner email
        #[arg(long)]
        email: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    user_id: String,
    expires_at: String,
    access_token: String,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue { user_id, email } => {
            if config.auth.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
                output::print_warning("auth.jwt_secret is the default; the token is only good for local use");
            }
            let issued = JwtEncoder::new(&config.auth).issue(*user_id, email)?;
            output::print_item(
                &TokenRow {
                    user_id: user_id.to_string(),
                    expires_at: issued.expires_at.to_rfc3339(),
                    access_token: issued.access_token,
                },
                format,
            );
        }
    }
    Ok(())
}
