//! REST endpoints for block relationships.
//!
//! POST /api/v1/accounts/{id}/block — Block an account (write:blocks scope)
//! GET /api/v1/blocks — List the caller's blocks, cursor-paginated
//! (read:blocks scope)

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::{require_scope, Claims};
use crate::blocks::pagination::{paginate, Page, PageParams};
use crate::blocks::service::{self, BlockError};
use crate::blocks::store;
use crate::db::models::Block;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    /// Stealth blocks take full local effect but are never announced to
    /// the target's server.
    #[serde(default)]
    pub stealth: bool,
}

#[derive(Debug, Serialize)]
pub struct BlockResponse {
    pub id: String,
    pub target_account_id: String,
    pub blocking: bool,
    pub stealth: bool,
}

/// POST /api/v1/accounts/{id}/block
///
/// Records the block and triggers best-effort federation delivery.
/// A failed delivery does not change the response — the block succeeded
/// locally either way. Repeat blocks return the existing relationship.
/// The JSON body is optional; a bare POST is a plain (non-stealth) block.
pub async fn create_block(
    State(state): State<AppState>,
    claims: Claims,
    Path(target_id): Path<i64>,
    body: Option<Json<BlockRequest>>,
) -> Result<Json<BlockResponse>, (StatusCode, String)> {
    require_scope(&claims, "write:blocks")?;
    let blocker_id = claims
        .account_id()
        .map_err(|s| (s, "Invalid token subject".to_string()))?;
    let stealth = body.map(|Json(req)| req.stealth).unwrap_or(false);

    let outcome = service::block(&state, blocker_id, target_id, stealth)
        .await
        .map_err(|e| match e {
            BlockError::SelfBlock => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            BlockError::AccountNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
            BlockError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    if outcome.created {
        tracing::info!(
            "Account {} blocked {} (delivery: {:?})",
            blocker_id,
            target_id,
            outcome.delivery
        );
    }

    Ok(Json(BlockResponse {
        id: outcome.block.id.to_string(),
        target_account_id: outcome.block.target_account_id.to_string(),
        blocking: true,
        stealth: outcome.block.stealth,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListBlocksQuery {
    pub limit: Option<usize>,
    pub max_id: Option<i64>,
    pub since_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BlockEntry {
    pub target_account_id: String,
    /// Visible to the blocker only — this endpoint is self-scoped, and the
    /// flag must never appear on any surface the target can read.
    pub stealth: bool,
}

/// GET /api/v1/blocks?limit=&since_id=&max_id=
///
/// The caller's blocks, newest first, with Link-header navigation.
/// `rel="next"` carries the page's smallest id as max_id; `rel="prev"`
/// carries the largest as since_id (also usable to poll for newer entries).
pub async fn list_blocks(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListBlocksQuery>,
) -> Result<(HeaderMap, Json<Vec<BlockEntry>>), (StatusCode, String)> {
    require_scope(&claims, "read:blocks")?;
    let account_id = claims
        .account_id()
        .map_err(|s| (s, "Invalid token subject".to_string()))?;

    let limit = query
        .limit
        .unwrap_or(state.default_page_limit)
        .clamp(1, state.max_page_limit);

    let db = state.db.clone();
    let blocks = tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB lock".to_string()))?;
        store::list_descending(&conn, account_id).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Query blocks: {}", e),
            )
        })
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task join: {}", e)))??;

    let page = paginate(
        blocks,
        |b: &Block| b.id,
        &PageParams {
            since_id: query.since_id,
            max_id: query.max_id,
            limit,
        },
    );

    let mut headers = HeaderMap::new();
    if let Some(link) = link_header(&state.base_url, query.limit, &page) {
        headers.insert(
            axum::http::header::LINK,
            link.parse().map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid Link header".to_string(),
                )
            })?,
        );
    }

    let entries = page
        .items
        .iter()
        .map(|b| BlockEntry {
            target_account_id: b.target_account_id.to_string(),
            stealth: b.stealth,
        })
        .collect();

    Ok((headers, Json(entries)))
}

/// Build the Link header from the page cursors. An explicitly requested
/// limit is preserved in both relations; either relation is omitted when
/// its cursor is absent, and no header is emitted if both are.
fn link_header(base_url: &str, requested_limit: Option<usize>, page: &Page<Block>) -> Option<String> {
    let url = |cursor_param: &str, cursor: i64| {
        let mut params = Vec::new();
        if let Some(limit) = requested_limit {
            params.push(format!("limit={}", limit));
        }
        params.push(format!("{}={}", cursor_param, cursor));
        format!("{}/api/v1/blocks?{}", base_url, params.join("&"))
    };

    let mut relations = Vec::new();
    if let Some(next) = page.next_cursor {
        relations.push(format!("<{}>; rel=\"next\"", url("max_id", next)));
    }
    if let Some(prev) = page.prev_cursor {
        relations.push(format!("<{}>; rel=\"prev\"", url("since_id", prev)));
    }

    if relations.is_empty() {
        None
    } else {
        Some(relations.join(", "))
    }
}
