mod accounts;
mod auth;
mod blocks;
mod config;
mod db;
mod federation;
mod routes;
mod state;

use std::time::Duration;

use tokio::net::TcpListener;

use config::{generate_config_template, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "fedra_server=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "fedra_server=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("Fedra server v{} starting", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite database
    let db = db::init_db(&config.data_dir)?;

    // Load or generate JWT signing key (256-bit random, stored in data_dir)
    let jwt_secret = auth::jwt::load_or_generate_jwt_secret(&config.data_dir)?;

    let api_config = config.api.clone().unwrap_or_default();
    let federation_config = config.federation.clone().unwrap_or_default();

    // Shared outbound client for federation delivery
    let http = reqwest::Client::builder()
        .user_agent(concat!("fedra-server/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // Build application state
    let app_state = state::AppState {
        db,
        jwt_secret,
        http,
        base_url: config.base_url.trim_end_matches('/').to_string(),
        default_page_limit: api_config.default_page_limit,
        max_page_limit: api_config.max_page_limit,
        delivery_timeout: Duration::from_secs(federation_config.delivery_timeout_secs),
    };

    // Build router
    let app = routes::build_router(app_state);

    // Bind and serve
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
