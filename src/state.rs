use std::time::Duration;

use crate::db::DbPool;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection wrapped in Arc<Mutex>
    pub db: DbPool,
    /// JWT signing secret (256-bit random key)
    pub jwt_secret: Vec<u8>,
    /// Shared outbound HTTP client for federation delivery
    pub http: reqwest::Client,
    /// Public base URL of this server (for Link headers and actor URIs)
    pub base_url: String,
    /// Page size when the listing request carries no limit parameter
    pub default_page_limit: usize,
    /// Hard ceiling on requested page sizes
    pub max_page_limit: usize,
    /// Deadline for a single outbound delivery attempt
    pub delivery_timeout: Duration,
}
