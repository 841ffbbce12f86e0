//! Block relationships: persistence, propagation, and the listing API.
//!
//! A block is a directed edge from one account to another. Local state is
//! the source of truth; remote servers are notified best-effort through
//! the federation delivery dispatcher, unless the block is stealth.

pub mod pagination;
pub mod routes;
pub mod service;
pub mod store;
