// src/lib.rs
pub mod config;
pub mod jellyfin;

// Re-export the client types so they appear at crate root
pub use crate::jellyfin::{ApiKey, ApiKeyQueryResult, Client, ClientConfig, KeyManager};
