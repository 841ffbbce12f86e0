//! Database row types for all tables.
//! These correspond 1:1 to the SQLite schema defined in migrations.rs.

use std::fmt;
use std::str::FromStr;

/// How a block notification reaches an account's home server.
/// Closed set — adding a protocol forces every match site to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryProtocol {
    /// Account lives on this server; nothing to deliver.
    Local,
    /// Legacy push federation: signed envelope POSTed to `push_url`.
    Push,
    /// ActivityPub: Block activity POSTed to `inbox_url`.
    ActivityPub,
}

impl DeliveryProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryProtocol::Local => "local",
            DeliveryProtocol::Push => "push",
            DeliveryProtocol::ActivityPub => "activitypub",
        }
    }
}

impl fmt::Display for DeliveryProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(DeliveryProtocol::Local),
            "push" => Ok(DeliveryProtocol::Push),
            "activitypub" => Ok(DeliveryProtocol::ActivityPub),
            other => Err(format!("Unknown delivery protocol: {}", other)),
        }
    }
}

/// Account record in the accounts table.
/// `domain` is None for local accounts; remote accounts carry the endpoint
/// matching their protocol.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub domain: Option<String>,
    pub protocol: DeliveryProtocol,
    pub push_url: Option<String>,
    pub inbox_url: Option<String>,
    pub created_at: String,
}

/// Directed block edge. `id` is monotonic and serves as the cursor key
/// for the listing endpoint.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: i64,
    pub account_id: i64,
    pub target_account_id: i64,
    pub stealth: bool,
    pub created_at: String,
}
