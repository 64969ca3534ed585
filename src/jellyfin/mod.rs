pub mod api;
pub mod error;
pub mod key_manager;

// Re-export the client for convenience
pub use api::{ApiKey, ApiKeyQueryResult, Client, ClientConfig};
pub use error::ClientError;
pub use key_manager::{KeyError, KeyManager, KeySelector};
