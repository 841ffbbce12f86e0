//! Integration tests for the cursor-paginated block listing endpoint.

use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;

use fedra_server::accounts::store as accounts;
use fedra_server::auth::jwt::issue_access_token;
use fedra_server::db::models::{Account, DeliveryProtocol};
use fedra_server::state::AppState;

async fn start_test_server() -> (String, AppState) {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = tmp_dir.path().to_str().unwrap().to_string();

    let db = fedra_server::db::init_db(&data_dir).expect("Failed to init DB");
    let jwt_secret = fedra_server::auth::jwt::load_or_generate_jwt_secret(&data_dir)
        .expect("Failed to generate JWT secret");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let state = AppState {
        db,
        jwt_secret,
        http: reqwest::Client::new(),
        base_url: base_url.clone(),
        default_page_limit: 40,
        max_page_limit: 80,
        delivery_timeout: Duration::from_secs(2),
    };

    let app = fedra_server::routes::build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
        let _keep = tmp_dir;
    });

    (base_url, state)
}

fn seed_local(state: &AppState, username: &str) -> Account {
    accounts::create_account(&state.db, username, None, DeliveryProtocol::Local, None, None)
        .expect("Failed to seed local account")
}

fn token_for(state: &AppState, account: &Account) -> String {
    issue_access_token(&state.jwt_secret, account.id, "read:blocks write:blocks")
        .expect("Failed to issue token")
}

/// Block the target and return the new edge's id.
async fn block(base_url: &str, token: &str, target_id: i64, stealth: bool) -> i64 {
    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/accounts/{}/block", base_url, target_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "stealth": stealth }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "Block setup failed");
    let body: serde_json::Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn get_blocks(base_url: &str, token: &str, query: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(format!("{}/api/v1/blocks{}", base_url, query))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_listing_returns_http_success() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let token = token_for(&state, &alice);

    let resp = get_blocks(&base_url, &token, "").await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_reports_stealth_per_block() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let token = token_for(&state, &alice);

    block(&base_url, &token, bob.id, false).await;
    block(&base_url, &token, carol.id, true).await;

    let resp = get_blocks(&base_url, &token, "").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    for entry in entries {
        let target = entry["target_account_id"].as_str().unwrap();
        let expected_stealth = target == carol.id.to_string();
        assert_eq!(
            entry["stealth"].as_bool().unwrap(),
            expected_stealth,
            "Wrong stealth flag for target {}",
            target
        );
    }
}

#[tokio::test]
async fn test_listing_orders_newest_first() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let token = token_for(&state, &alice);

    block(&base_url, &token, bob.id, false).await;
    block(&base_url, &token, carol.id, false).await;

    let resp = get_blocks(&base_url, &token, "").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries[0]["target_account_id"], carol.id.to_string());
    assert_eq!(entries[1]["target_account_id"], bob.id.to_string());
}

#[tokio::test]
async fn test_listing_respects_limit() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let token = token_for(&state, &alice);

    block(&base_url, &token, bob.id, false).await;
    block(&base_url, &token, carol.id, false).await;

    let resp = get_blocks(&base_url, &token, "?limit=1").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_listing_max_id_is_exclusive() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let token = token_for(&state, &alice);

    let _first = block(&base_url, &token, bob.id, false).await;
    let second = block(&base_url, &token, carol.id, false).await;

    let resp = get_blocks(&base_url, &token, &format!("?max_id={}", second)).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["target_account_id"], bob.id.to_string());
}

#[tokio::test]
async fn test_listing_since_id_is_exclusive() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let token = token_for(&state, &alice);

    let first = block(&base_url, &token, bob.id, false).await;
    let _second = block(&base_url, &token, carol.id, false).await;

    let resp = get_blocks(&base_url, &token, &format!("?since_id={}", first)).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["target_account_id"], carol.id.to_string());
}

#[tokio::test]
async fn test_listing_link_header_next_and_prev() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let carol = seed_local(&state, "carol");
    let dave = seed_local(&state, "dave");
    let token = token_for(&state, &alice);

    let _b1 = block(&base_url, &token, bob.id, false).await;
    let b2 = block(&base_url, &token, carol.id, false).await;
    let b3 = block(&base_url, &token, dave.id, false).await;

    // Page of 2 over 3 edges: next points below the page, prev above it.
    let resp = get_blocks(&base_url, &token, "?limit=2").await;
    let link = resp
        .headers()
        .get("Link")
        .expect("Link header expected")
        .to_str()
        .unwrap()
        .to_string();

    assert!(
        link.contains(&format!(
            "<{}/api/v1/blocks?limit=2&max_id={}>; rel=\"next\"",
            base_url, b2
        )),
        "Unexpected next relation in: {}",
        link
    );
    assert!(
        link.contains(&format!(
            "<{}/api/v1/blocks?limit=2&since_id={}>; rel=\"prev\"",
            base_url, b3
        )),
        "Unexpected prev relation in: {}",
        link
    );
}

#[tokio::test]
async fn test_listing_link_header_prev_only_on_last_page() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let token = token_for(&state, &alice);

    let b1 = block(&base_url, &token, bob.id, false).await;

    let resp = get_blocks(&base_url, &token, "").await;
    let link = resp
        .headers()
        .get("Link")
        .expect("Link header expected")
        .to_str()
        .unwrap()
        .to_string();

    assert_eq!(
        link,
        format!("<{}/api/v1/blocks?since_id={}>; rel=\"prev\"", base_url, b1),
        "A full listing has a prev relation (for polling) and no next"
    );
}

#[tokio::test]
async fn test_listing_no_link_header_when_empty() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let token = token_for(&state, &alice);

    let resp = get_blocks(&base_url, &token, "").await;
    assert!(resp.headers().get("Link").is_none());
}

#[tokio::test]
async fn test_listing_wrong_scope_is_forbidden() {
    let (base_url, state) = start_test_server().await;
    let alice = seed_local(&state, "alice");
    let bob = seed_local(&state, "bob");
    let full_token = token_for(&state, &alice);
    block(&base_url, &full_token, bob.id, false).await;

    let write_only =
        issue_access_token(&state.jwt_secret, alice.id, "write:blocks").expect("token");
    let resp = get_blocks(&base_url, &write_only, "").await;
    assert_eq!(resp.status(), 403);

    // No partial data leaks past the scope check.
    let body = resp.text().await.unwrap();
    assert!(
        !body.contains(&bob.id.to_string()),
        "Forbidden response must not contain block entries"
    );
}

#[tokio::test]
async fn test_listing_requires_token() {
    let (base_url, _state) = start_test_server().await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/v1/blocks", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}
