use std::sync::Arc;

use clap::Parser;

use deliveryhub_client::{ClientConfig, FileTokenStore, HttpApiClient, SessionManager};
use deliveryhub_observability::LogFormat;

mod commands;

use commands::Command;

/// Terminal client for the DeliveryHub dashboard API.
#[derive(Debug, Parser)]
#[command(name = "deliveryhub", version)]
struct Cli {
    /// Backend base URL (overrides DELIVERYHUB_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit logs as JSON instead of compact lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs { LogFormat::Json } else { LogFormat::Compact };
    deliveryhub_observability::tracing::init_with_default(format, "warn");

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }

    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let api = Arc::new(HttpApiClient::new(&config, tokens.clone())?);
    let manager = SessionManager::new(api.clone(), tokens.clone());

    // Startup always attempts to restore the previous session.
    if let Err(err) = manager.hydrate().await {
        tracing::debug!(error = %err, "no session restored");
    }

    commands::run(cli.command, &manager, api, &tokens, &config).await
}
