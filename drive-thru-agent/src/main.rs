mod console;
mod handlers;
mod mcp;
mod models;
#[cfg(test)]
mod testing;
mod voice;

use crate::handlers::AppState;
use crate::mcp::DriveThruMcp;
use crate::voice::VoiceTokens;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use drive_thru_sdk::assets::{download_assets, AssetStatus};
use drive_thru_sdk::config::{load_env_files, AgentConfig};
use drive_thru_sdk::llm::{ChatModel, LLM};
use drive_thru_sdk::menu::{MenuSource, SpiceRouteMenu};
use drive_thru_sdk::session::{DriveThruSession, SessionManager, SessionSettings};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpListener;

/// Spice Route drive-thru ordering agent.
///
/// Every option can also be set through the environment variable named in
/// its help, including from `.env.local` or `.env`.
#[derive(Debug, Parser)]
#[command(name = "drive-thru-agent", version)]
struct Cli {
    #[command(flatten)]
    config: AgentConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Talk to the agent in this terminal.
    Console,
    /// Serve the session API and the MCP tool endpoint.
    Start,
    /// Fetch the configured asset files.
    DownloadFiles,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_files = load_env_files();
    drive_thru_sdk::logger::init_logging();
    for file in env_files {
        tracing::debug!("Loaded {}", file);
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Console => console_session(cli.config).await,
        Command::Start => serve(cli.config).await,
        Command::DownloadFiles => download_files(cli.config).await,
    }
}

async fn console_session(config: AgentConfig) -> anyhow::Result<()> {
    let llm: Arc<dyn ChatModel> = Arc::new(LLM::new(config.llm.clone()));
    let settings = SessionSettings::from(&config);
    let session = DriveThruSession::start(
        uuid::Uuid::new_v4().to_string(),
        llm,
        &SpiceRouteMenu,
        &settings,
    )
    .await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    console::run_console(&session, stdin, &mut stdout).await?;
    Ok(())
}

fn router(state: Arc<AppState>, mcp: StreamableHttpService<DriveThruMcp, LocalSessionManager>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/alive", get(handlers::alive))
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/{id}", axum::routing::delete(handlers::end_session))
        .route("/api/sessions/{id}/message", post(handlers::submit_message))
        .route("/api/sessions/{id}/order", get(handlers::get_order))
        .route("/api/sessions/{id}/receipt", get(handlers::get_receipt))
        .nest_service("/mcp", mcp)
        .with_state(state)
}

async fn serve(config: AgentConfig) -> anyhow::Result<()> {
    let llm: Arc<dyn ChatModel> = Arc::new(LLM::new(config.llm.clone()));
    let sessions = SessionManager::new(
        llm,
        Arc::new(SpiceRouteMenu),
        SessionSettings::from(&config),
    );

    let voice = VoiceTokens::from_config(&config.livekit);
    if voice.is_none() {
        tracing::warn!("LiveKit credentials not set, sessions will be created without join tokens");
    }
    let state = Arc::new(AppState::new(sessions, voice));

    let menu = SpiceRouteMenu.load_menu().await;
    let receipt_base = config.receipt_path.clone();
    let mcp = StreamableHttpService::new(
        move || Ok(DriveThruMcp::new(menu.clone(), &receipt_base)),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let app = router(state, mcp);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn download_files(config: AgentConfig) -> anyhow::Result<()> {
    let urls: Vec<String> = config
        .asset_urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        tracing::warn!("DRIVE_THRU_ASSET_URLS is empty, nothing to download");
        return Ok(());
    }

    let results = download_assets(&urls, &config.assets_dir).await?;
    let fetched = results
        .iter()
        .filter(|r| matches!(r, AssetStatus::Downloaded(_)))
        .count();
    tracing::info!(
        "{} asset(s) downloaded, {} already present in {}",
        fetched,
        results.len() - fetched,
        config.assets_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["drive-thru-agent", "--model", "gpt-4o", "console"]).unwrap();
        assert_eq!(cli.config.llm.model, "gpt-4o");
        assert!(matches!(cli.command, Command::Console));

        let cli = Cli::try_parse_from(["drive-thru-agent", "start", "--bind", "127.0.0.1:8080"]).unwrap();
        assert!(matches!(cli.command, Command::Start));
        assert_eq!(cli.config.bind, "127.0.0.1:8080");

        let cli = Cli::try_parse_from(["drive-thru-agent", "download-files", "--receipt", "out.json"]).unwrap();
        assert!(matches!(cli.command, Command::DownloadFiles));
        assert_eq!(cli.config.receipt_path, PathBuf::from("out.json"));

        assert!(Cli::try_parse_from(["drive-thru-agent"]).is_err());
    }

    #[test]
    fn test_cli_max_tool_steps_flows_into_sessions() {
        let cli = Cli::try_parse_from(["drive-thru-agent", "console", "--max-tool-steps", "3"]).unwrap();
        let settings = SessionSettings::from(&cli.config);
        assert_eq!(settings.max_tool_steps, 3);
    }
}
