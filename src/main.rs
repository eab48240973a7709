use std::process::ExitCode;
use std::sync::Arc;
use youtube_search::{api, logging};
use youtube_search::config::Config;
use youtube_search::youtube::YouTubeClient;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(&config);

    let platform = YouTubeClient::new(reqwest::Client::new(), config.api_key.clone(), config.max_results);
    let state = Arc::new(api::AppState::new(Arc::new(platform), config.scroll, config.feed_idle_ttl));
    api::spawn_feed_sweeper(&state);
    let app = api::create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %config.bind_addr, "server starting");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
