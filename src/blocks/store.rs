//! SQLite-backed store for block edges.
//!
//! The unique index on (account_id, target_account_id) makes creation
//! idempotent: a concurrent or repeated insert lands on the existing row.

use rusqlite::{Connection, OptionalExtension};

use crate::db::models::Block;

fn block_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    Ok(Block {
        id: row.get(0)?,
        account_id: row.get(1)?,
        target_account_id: row.get(2)?,
        stealth: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Create the block edge if absent; return the edge and whether this call
/// created it. An existing edge is returned unchanged — in particular its
/// stealth flag keeps its first-write value.
pub fn create_if_absent(
    conn: &Connection,
    account_id: i64,
    target_account_id: i64,
    stealth: bool,
) -> rusqlite::Result<(Block, bool)> {
    conn.execute(
        "INSERT INTO blocks (account_id, target_account_id, stealth)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (account_id, target_account_id) DO NOTHING",
        rusqlite::params![account_id, target_account_id, stealth],
    )?;
    let created = conn.changes() > 0;

    let block = conn.query_row(
        "SELECT id, account_id, target_account_id, stealth, created_at
         FROM blocks WHERE account_id = ?1 AND target_account_id = ?2",
        [account_id, target_account_id],
        block_from_row,
    )?;

    Ok((block, created))
}

/// All block edges for an account, newest id first.
/// Id order is the canonical listing order; pagination slices this.
pub fn list_descending(conn: &Connection, account_id: i64) -> rusqlite::Result<Vec<Block>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, target_account_id, stealth, created_at
         FROM blocks WHERE account_id = ?1 ORDER BY id DESC",
    )?;
    let blocks = stmt
        .query_map([account_id], block_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(blocks)
}

/// Whether account_id currently blocks target_account_id.
pub fn is_blocking(
    conn: &Connection,
    account_id: i64,
    target_account_id: i64,
) -> rusqlite::Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM blocks WHERE account_id = ?1 AND target_account_id = ?2",
            [account_id, target_account_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
