//! Outbound block notification delivery.
//!
//! One invocation makes at most one network call: zero for local targets,
//! exactly one POST for remote ones. There is no retry loop here — the
//! caller decides what a failed delivery means (for blocks: nothing, local
//! state already committed and remote convergence is best-effort).

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::db::models::{Account, DeliveryProtocol};

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The remote endpoint accepted the notification.
    Sent,
    /// Target is local — there is no remote server to notify.
    Skipped,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network error, timeout, or non-2xx response from the remote endpoint.
    #[error("Target {target} unreachable: {reason}")]
    Unreachable { target: String, reason: String },
    /// The account's protocol requires an endpoint URL it does not carry.
    #[error("Account {target} has no {missing} for its delivery protocol")]
    Unsupported {
        target: String,
        missing: &'static str,
    },
}

/// Webfinger-style handle for logs and payloads: `user` or `user@domain`.
fn acct(account: &Account) -> String {
    match &account.domain {
        Some(domain) => format!("{}@{}", account.username, domain),
        None => account.username.clone(),
    }
}

/// ActivityPub actor URI for an account. Local actors live under our own
/// base URL; remote actors under their home domain.
fn actor_uri(account: &Account, local_base: &str) -> String {
    match &account.domain {
        Some(domain) => format!("https://{}/users/{}", domain, account.username),
        None => format!("{}/users/{}", local_base, account.username),
    }
}

/// Block activity for ActivityPub inbox delivery.
fn block_activity(actor: &Account, target: &Account, local_base: &str) -> serde_json::Value {
    let actor_id = actor_uri(actor, local_base);
    json!({
        "@context": "https://www.w3.org/ns/activitystreams",
        "id": format!("{}#blocks/{}", actor_id, target.id),
        "type": "Block",
        "actor": actor_id,
        "object": actor_uri(target, local_base),
    })
}

/// Envelope for the legacy push protocol. Payload signing is handled by
/// the outbound transport layer and is not modelled here.
fn push_envelope(actor: &Account, target: &Account) -> serde_json::Value {
    json!({
        "event": "block",
        "actor": acct(actor),
        "object": acct(target),
    })
}

/// Deliver a block notification to the target's home server.
///
/// Dispatches on the target's delivery protocol; the match is exhaustive,
/// so a new protocol variant cannot be added without deciding its delivery
/// behavior here.
pub async fn deliver_block(
    http: &reqwest::Client,
    actor: &Account,
    target: &Account,
    local_base: &str,
    timeout: Duration,
) -> Result<Delivery, DeliveryError> {
    let (url, body, content_type) = match target.protocol {
        DeliveryProtocol::Local => return Ok(Delivery::Skipped),
        DeliveryProtocol::Push => {
            let url = target.push_url.as_deref().ok_or(DeliveryError::Unsupported {
                target: acct(target),
                missing: "push_url",
            })?;
            (url, push_envelope(actor, target), "application/json")
        }
        DeliveryProtocol::ActivityPub => {
            let url = target
                .inbox_url
                .as_deref()
                .ok_or(DeliveryError::Unsupported {
                    target: acct(target),
                    missing: "inbox_url",
                })?;
            (
                url,
                block_activity(actor, target, local_base),
                "application/activity+json",
            )
        }
    };

    let response = http
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .json(&body)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| DeliveryError::Unreachable {
            target: acct(target),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(DeliveryError::Unreachable {
            target: acct(target),
            reason: format!("HTTP {}", response.status()),
        });
    }

    tracing::debug!(
        "Delivered block notification to {} via {}",
        acct(target),
        target.protocol
    );
    Ok(Delivery::Sent)
}
