//! Share inspection and revocation commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use livepet_core::config::AppConfig;
use livepet_core::config::database::StoreProvider;
use livepet_core::error::AppError;
use livepet_core::types::{PageRequest, ShareId, UserId};
use livepet_database::Stores;
use livepet_entity::access_log::AccessLogEntry;
use livepet_service::notification::build_relay;
use livepet_service::share::ShareSummary;
use livepet_service::{RequestContext, ShareService};

use crate::output::{self, OutputFormat};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct SharesArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: SharesCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum SharesCommand {
    /// List an owner's shares, newest first
    List {
        /// Owner user ID
        #[arg(long)]
        owner: UserId,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        per_page: u64,
    },
    /// Revoke one of an owner's shares
    Revoke {
        /// Owner user ID
        #[arg(long)]
        owner: UserId,
        /// Share ID
        #[arg(long)]
        id: ShareId,
    },
    /// Show the access log of a share
    Logs {
        /// Share ID
        #[arg(long)]
        id: ShareId,
    },
}

/// Share display row
#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    id: String,
    pet: String,
    recipient: String,
    state: String,
    views: String,
    code: String,
    expires: String,
}

impl From<&ShareSummary> for ShareRow {
    fn from(s: &ShareSummary) -> Self {
        let grant = &s.grant;
        Self {
            id: grant.id.to_string(),
            pet: grant.pet_id.to_string(),
            recipient: grant.recipient_email.clone(),
            state: format!("{:?}", s.state).to_lowercase(),
            views: match grant.max_views {
                Some(max) => format!("{}/{}", grant.views_count, max),
                None => grant.views_count.to_string(),
            },
            code: if s.requires_code { "yes" } else { "no" }.to_string(),
            expires: grant.expires_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Access log display row
#[derive(Debug, Serialize, Tabled)]
struct AccessLogRow {
    accessed_at: String,
    success: String,
    section: String,
    ip: String,
    user_agent: String,
}

impl From<&AccessLogEntry> for AccessLogRow {
    fn from(e: &AccessLogEntry) -> Self {
        Self {
            accessed_at: e.accessed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            success: if e.success { "✓" } else { "✗" }.to_string(),
            section: e.viewed_section.clone(),
            ip: e.ip_address.clone().unwrap_or_default(),
            user_agent: e.user_agent.clone().unwrap_or_default(),
        }
    }
}

/// Execute share commands
pub async fn execute(
    args: &SharesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if config.database.provider == StoreProvider::Memory {
        output::print_warning("database.provider is \"memory\"; there are no persisted shares to show");
    }

    let stores = Stores::connect(&config.database).await?;
    let service = ShareService::new(
        Arc::clone(&stores.shares),
        Arc::clone(&stores.health),
        build_relay(&config.notification)?,
        config.share.clone(),
        Duration::from_secs(config.notification.timeout_seconds),
    );

    match &args.command {
        SharesCommand::List {
            owner,
            page,
            per_page,
        } => {
            let result = service
                .list_shares(&operator(*owner), PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<ShareRow> = result.items.iter().map(ShareRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv(
                    "Page",
                    &format!("{} of {} ({} shares)", result.page, result.total_pages, result.total_items),
                );
            }
        }
        SharesCommand::Revoke { owner, id } => {
            let summary = service.revoke(&operator(*owner), *id).await?;
            output::print_item(&ShareRow::from(&summary), format);
            output::print_success(&format!("Share {id} revoked"));
        }
        SharesCommand::Logs { id } => {
            let entries = stores.shares.list_access_logs(*id).await?;
            let rows: Vec<AccessLogRow> = entries.iter().map(AccessLogRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

/// Context for acting on behalf of an owner from the command line.
fn operator(owner: UserId) -> RequestContext {
    RequestContext::new(owner, "cli@localhost".to_string(), None, Some("livepet-cli".to_string()))
}
