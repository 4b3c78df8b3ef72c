use std::sync::Arc;

use conversation_archive_mcp::{
    archive_client::HttpArchiveClient, build_app, config::Config, logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let archive = Arc::new(HttpArchiveClient::new(config.archive_api_url.clone()));
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(archive);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        archive_api_url = %config.archive_api_url,
        "server starting"
    );
    info!("MCP endpoint: http://{bind_socket}/mcp");
    info!("Health check: http://{bind_socket}/health");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
