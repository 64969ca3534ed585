// src/jellyfin/key_manager.rs
use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::jellyfin::api::{ApiKey, Client};
use crate::jellyfin::error::ClientError;

/// Which attribute a key lookup matches on. Exactly one attribute is
/// always present, so callers cannot ask for an ambiguous lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySelector {
    AccessToken(String),
    AppName(String),
}

impl KeySelector {
    fn describe(&self) -> &'static str {
        match self {
            KeySelector::AccessToken(_) => "access token",
            KeySelector::AppName(_) => "app name",
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("created an API key for app {0:?} but could not find it afterwards")]
    CreatedKeyMissing(String),

    #[error("no API key matched the requested {0}")]
    NotFound(&'static str),
}

/// Lifecycle operations over the raw key endpoints.
pub struct KeyManager {
    client: Client,
}

impl KeyManager {
    /// Create a new key manager with the provided client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create a key named `app_name` and return the created record.
    ///
    /// The creation endpoint returns no body, so the new key is located by
    /// diffing the key list before and after creation and matching on the
    /// app name. The first new name-matching key in list order is chosen;
    /// if other actors create keys concurrently the selection can
    /// misattribute, since the server neither returns the created entity
    /// nor enforces unique app names.
    pub async fn create(&self, app_name: &str) -> Result<ApiKey, KeyError> {
        debug!("Creating API key for app {:?}", app_name);

        let before = self.client.get_keys().await?;
        let existing: HashSet<&str> = before
            .items
            .iter()
            .map(|key| key.access_token.as_str())
            .collect();

        self.client.create_key(app_name).await?;

        let after = self.client.get_keys().await?;
        let created = locate_created(&existing, after.items, app_name)
            .ok_or_else(|| KeyError::CreatedKeyMissing(app_name.to_string()))?;

        info!("Created API key for app {:?}", app_name);
        Ok(created)
    }

    /// Fetch the key identified by `access_token`. `None` means the key no
    /// longer exists on the server and the caller should drop its record.
    pub async fn get(&self, access_token: &str) -> Result<Option<ApiKey>, KeyError> {
        Ok(self.client.get_key(access_token).await?)
    }

    /// Fetch the key matched by `selector`, failing if nothing matches.
    pub async fn lookup(&self, selector: &KeySelector) -> Result<ApiKey, KeyError> {
        let key = match selector {
            KeySelector::AccessToken(token) => self.client.get_key(token).await?,
            KeySelector::AppName(name) => self.client.find_key_by_app_name(name).await?,
        };

        key.ok_or(KeyError::NotFound(selector.describe()))
    }

    /// Delete the key identified by `access_token`.
    pub async fn delete(&self, access_token: &str) -> Result<(), KeyError> {
        self.client.delete_key(access_token).await?;
        Ok(())
    }
}

fn locate_created(
    existing: &HashSet<&str>,
    after: Vec<ApiKey>,
    app_name: &str,
) -> Option<ApiKey> {
    after
        .into_iter()
        .find(|key| !existing.contains(key.access_token.as_str()) && key.app_name == app_name)
}
