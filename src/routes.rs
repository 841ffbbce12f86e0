use axum::{middleware, Router};

use crate::auth::middleware::JwtSecret;
use crate::blocks::routes as block_routes;
use crate::state::AppState;

/// Inject the JWT secret into request extensions so the Claims extractor can find it.
async fn inject_jwt_secret(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    req.extensions_mut()
        .insert(JwtSecret(state.jwt_secret.clone()));
    next.run(req).await
}

/// Build the full axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Authenticated routes (JWT required — Claims extractor validates token,
    // handlers enforce per-endpoint scopes)
    let api_routes = Router::new()
        .route(
            "/api/v1/blocks",
            axum::routing::get(block_routes::list_blocks),
        )
        .route(
            "/api/v1/accounts/{id}/block",
            axum::routing::post(block_routes::create_block),
        );

    // Health check
    let health = Router::new().route("/health", axum::routing::get(health_check));

    Router::new()
        .merge(api_routes)
        .merge(health)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            inject_jwt_secret,
        ))
        .with_state(state)
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
