use std::sync::Arc;

use slack_relay::slack::SlackClient;
use slack_relay::{configure_routes, AppState, Config, SessionStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let slack = SlackClient::new(config.slack_api_base.clone())?;
    let sessions = SessionStore::new(config.session_secret.clone(), config.session_ttl);
    let _sweeper = sessions.spawn_sweeper();

    let addr = config.socket_addr();
    let routes = configure_routes(AppState::new(config, Arc::new(slack), sessions));

    info!("Starting server on http://{}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
