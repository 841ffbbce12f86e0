use rusqlite_migration::{Migrations, M};

/// Define all schema migrations.
/// Uses SQLite user_version pragma for tracking — no migration table needed.
pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        M::up(
            "-- Migration 1: Accounts

-- Known accounts, both local and remote. Remote accounts carry the
-- delivery endpoint matching their protocol (push_url for legacy push,
-- inbox_url for ActivityPub). Integer ids are the canonical sort and
-- cursor key for every listing in this server.
CREATE TABLE accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    domain TEXT,
    protocol TEXT NOT NULL DEFAULT 'local',
    push_url TEXT,
    inbox_url TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_accounts_username_domain
    ON accounts(username, COALESCE(domain, ''));
",
        ),
        M::up(
            "-- Migration 2: Block relationships

-- Directed block edges. The unique index is the only serialization the
-- block service relies on: a conflicting concurrent insert surfaces as
-- 'already exists' and is treated as the idempotent outcome.
CREATE TABLE blocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    target_account_id INTEGER NOT NULL,
    stealth INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE,
    FOREIGN KEY (target_account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX idx_blocks_account_target
    ON blocks(account_id, target_account_id);
CREATE INDEX idx_blocks_account_id ON blocks(account_id, id);
",
        ),
    ])
}
