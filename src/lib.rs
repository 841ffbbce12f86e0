//! Fedra federation server library.
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod accounts;
pub mod auth;
pub mod blocks;
pub mod config;
pub mod db;
pub mod federation;
pub mod routes;
pub mod state;
