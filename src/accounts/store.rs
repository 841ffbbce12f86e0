//! Account lookup and creation against the accounts table.
//!
//! Accounts are immutable as far as the block subsystem is concerned:
//! remote account discovery and profile updates happen elsewhere. This
//! module resolves ids to delivery metadata and seeds new rows.

use rusqlite::{Connection, OptionalExtension};

use crate::db::models::{Account, DeliveryProtocol};
use crate::db::DbPool;

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let protocol: String = row.get(3)?;
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        domain: row.get(2)?,
        protocol: protocol.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?,
        push_url: row.get(4)?,
        inbox_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Resolve an account by id. Returns None if the account is unknown.
pub fn resolve(conn: &Connection, id: i64) -> rusqlite::Result<Option<Account>> {
    conn.query_row(
        "SELECT id, username, domain, protocol, push_url, inbox_url, created_at
         FROM accounts WHERE id = ?1",
        [id],
        account_from_row,
    )
    .optional()
}

/// Insert a new account and return it. Local accounts pass domain = None;
/// remote accounts must carry the endpoint matching their protocol.
pub fn create_account(
    db: &DbPool,
    username: &str,
    domain: Option<&str>,
    protocol: DeliveryProtocol,
    push_url: Option<&str>,
    inbox_url: Option<&str>,
) -> Result<Account, Box<dyn std::error::Error + Send + Sync>> {
    let conn = db.lock().map_err(|e| format!("DB lock error: {}", e))?;

    conn.execute(
        "INSERT INTO accounts (username, domain, protocol, push_url, inbox_url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![username, domain, protocol.as_str(), push_url, inbox_url],
    )?;
    let id = conn.last_insert_rowid();

    resolve(&conn, id)?.ok_or_else(|| "Account vanished after insert".into())
}
