//! Block orchestration: validate, persist, then notify.
//!
//! The local edge is committed before any delivery attempt, and a failed
//! delivery never rolls it back — local state is the source of truth and
//! remote convergence is best-effort.

use thiserror::Error;

use crate::accounts::store as accounts;
use crate::blocks::store;
use crate::db::models::{Account, Block};
use crate::federation::delivery::{self, Delivery};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("An account cannot block itself")]
    SelfBlock,
    #[error("Account {0} not found")]
    AccountNotFound(i64),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// What happened on the federation side of a block call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The remote server accepted the notification.
    Sent,
    /// No notification went out: local target, stealth block, or the edge
    /// already existed (a repeat block never re-notifies).
    Suppressed,
    /// Exactly one delivery attempt was made and failed. The local edge
    /// stands regardless.
    Failed(String),
}

#[derive(Debug)]
pub struct BlockOutcome {
    pub block: Block,
    /// False when the edge already existed (idempotent repeat).
    pub created: bool,
    pub delivery: DeliveryStatus,
}

/// Record that `blocker_id` blocks `target_id` and, unless the block is
/// stealth or a repeat, notify the target's home server.
///
/// Idempotent: a second call returns the existing edge unchanged (including
/// its original stealth flag) and attempts no further delivery.
pub async fn block(
    state: &AppState,
    blocker_id: i64,
    target_id: i64,
    stealth: bool,
) -> Result<BlockOutcome, BlockError> {
    if blocker_id == target_id {
        return Err(BlockError::SelfBlock);
    }

    // Persist first. Storage failures abort before any delivery attempt.
    let db = state.db.clone();
    let (blocker, target, block, created) = tokio::task::spawn_blocking(
        move || -> Result<(Account, Account, Block, bool), BlockError> {
            let conn = db
                .lock()
                .map_err(|_| BlockError::Storage("DB lock".to_string()))?;

            let blocker = accounts::resolve(&conn, blocker_id)
                .map_err(|e| BlockError::Storage(e.to_string()))?
                .ok_or(BlockError::AccountNotFound(blocker_id))?;
            let target = accounts::resolve(&conn, target_id)
                .map_err(|e| BlockError::Storage(e.to_string()))?
                .ok_or(BlockError::AccountNotFound(target_id))?;

            let (block, created) = store::create_if_absent(&conn, blocker_id, target_id, stealth)
                .map_err(|e| BlockError::Storage(e.to_string()))?;

            Ok((blocker, target, block, created))
        },
    )
    .await
    .map_err(|e| BlockError::Storage(format!("Task join: {}", e)))??;

    // Notify only for a newly created, non-stealth edge. The dispatcher
    // classifies local targets itself and skips them without a network call.
    let delivery = if created && !block.stealth {
        match delivery::deliver_block(
            &state.http,
            &blocker,
            &target,
            &state.base_url,
            state.delivery_timeout,
        )
        .await
        {
            Ok(Delivery::Sent) => DeliveryStatus::Sent,
            Ok(Delivery::Skipped) => DeliveryStatus::Suppressed,
            Err(e) => {
                tracing::warn!(
                    "Block {} -> {} recorded but notification failed: {}",
                    blocker.username,
                    target.username,
                    e
                );
                DeliveryStatus::Failed(e.to_string())
            }
        }
    } else {
        DeliveryStatus::Suppressed
    };

    Ok(BlockOutcome {
        block,
        created,
        delivery,
    })
}
