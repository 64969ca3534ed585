// src/jellyfin/api.rs
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::jellyfin::error::ClientError;

/// Jellyfin API client
/// Authenticates against a Jellyfin server and manages API keys through
/// the /Auth/Keys endpoints.

pub const DEFAULT_CLIENT_NAME: &str = "Terraform";
pub const DEFAULT_DEVICE_NAME: &str = "Terraform Provider";
pub const DEFAULT_DEVICE_ID: &str = "terraform-provider-jellyfin";
pub const DEFAULT_CLIENT_VERSION: &str = "1.0.0";

/// Overrides for the MediaBrowser client-identification fields sent during
/// authentication. Any field left `None` (or empty) falls back to its
/// default constant.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub client_name: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub client_version: Option<String>,
}

impl ClientConfig {
    fn authorization_header(&self) -> String {
        format!(
            r#"MediaBrowser Client="{}", Device="{}", DeviceId="{}", Version="{}""#,
            field_or(&self.client_name, DEFAULT_CLIENT_NAME),
            field_or(&self.device_name, DEFAULT_DEVICE_NAME),
            field_or(&self.device_id, DEFAULT_DEVICE_ID),
            field_or(&self.client_version, DEFAULT_CLIENT_VERSION),
        )
    }
}

fn field_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateRequest {
    pub username: String,
    pub pw: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SessionInfo {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthenticateResponse {
    pub access_token: String,
    pub server_id: String,
    pub user: AuthenticatedUser,
    pub session_info: SessionInfo,
}

/// A Jellyfin API key. The access token doubles as the key's identity;
/// the server exposes no other stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiKey {
    pub access_token: String,
    pub app_name: String,
    pub date_created: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApiKeyQueryResult {
    pub items: Vec<ApiKey>,
    pub total_record_count: i64,
    pub start_index: i64,
}

#[derive(Debug)]
pub struct Client {
    endpoint: String,
    access_token: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client from a known access token. No network call is made
    /// and the token is not validated.
    pub fn new(endpoint: &str, access_token: &str) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint),
            access_token: access_token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Authenticate with username and password using the default client
    /// identification.
    pub async fn with_auth(
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        Self::with_auth_config(endpoint, username, password, &ClientConfig::default()).await
    }

    /// Authenticate with username and password.
    ///
    /// # Arguments
    /// * `endpoint` - Server URL, e.g. `http://localhost:8096`
    /// * `username` - Jellyfin username
    /// * `password` - Jellyfin password
    /// * `config` - Client identification sent in the MediaBrowser header
    ///
    /// The credentials are used once and discarded; the returned client
    /// holds only the access token issued by the server. The same HTTP
    /// transport is reused for every subsequent call.
    pub async fn with_auth_config(
        endpoint: &str,
        username: &str,
        password: &str,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let endpoint = normalize_endpoint(endpoint);
        let http = reqwest::Client::new();

        debug!("Authenticating against {}", endpoint);

        let request = AuthenticateRequest {
            username: username.to_string(),
            pw: password.to_string(),
        };

        let response = http
            .post(format!("{}/Users/AuthenticateByName", endpoint))
            .header("Authorization", config.authorization_header())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("Authentication rejected with status {}", status);
            return Err(ClientError::AuthFailed { status, body });
        }

        let body = response.text().await?;
        let auth: AuthenticateResponse = serde_json::from_str(&body)?;

        if auth.access_token.is_empty() {
            return Err(ClientError::MissingAccessToken);
        }

        info!(
            "Authenticated as {} on server {}",
            auth.user.name, auth.server_id
        );

        Ok(Self {
            endpoint,
            access_token: auth.access_token,
            http,
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn keys_url(&self) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}/Auth/Keys", self.endpoint))?)
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, ClientError> {
        let response = self
            .http
            .request(method, url)
            .header(
                "Authorization",
                format!(r#"MediaBrowser Token="{}""#, self.access_token),
            )
            .send()
            .await?;

        Ok(response)
    }

    /// Retrieve all API keys.
    pub async fn get_keys(&self) -> Result<ApiKeyQueryResult, ClientError> {
        let response = self.send(Method::GET, self.keys_url()?).await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                error!("Error listing keys: {}", body);
                Err(ClientError::Api { status, body })
            }
        }
    }

    /// Retrieve the API key identified by `access_token`, or `None` if no
    /// key carries that token.
    pub async fn get_key(&self, access_token: &str) -> Result<Option<ApiKey>, ClientError> {
        let result = self.get_keys().await?;

        Ok(result
            .items
            .into_iter()
            .find(|key| key.access_token == access_token))
    }

    /// Retrieve the first API key named `app_name` in list order, or
    /// `None` if no key carries that name. App names are not unique on the
    /// server, so later keys with the same name are not considered.
    pub async fn find_key_by_app_name(
        &self,
        app_name: &str,
    ) -> Result<Option<ApiKey>, ClientError> {
        let result = self.get_keys().await?;

        Ok(result.items.into_iter().find(|key| key.app_name == app_name))
    }

    /// Create a new API key named `app_name`.
    ///
    /// The server returns no body for this call; the created key must be
    /// located through a follow-up listing.
    pub async fn create_key(&self, app_name: &str) -> Result<(), ClientError> {
        debug!("Creating API key for app {:?}", app_name);

        let mut url = self.keys_url()?;
        url.query_pairs_mut().append_pair("app", app_name);

        let response = self.send(Method::POST, url).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                error!("Error creating key: {}", body);
                Err(ClientError::Api { status, body })
            }
        }
    }

    /// Delete the API key identified by `access_token`.
    pub async fn delete_key(&self, access_token: &str) -> Result<(), ClientError> {
        debug!("Deleting API key");

        let mut url = self.keys_url()?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint(self.endpoint.clone()))?
            .push(access_token);

        let response = self.send(Method::DELETE, url).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                info!("Successfully deleted key");
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                error!("Error deleting key: {}", body);
                Err(ClientError::Api { status, body })
            }
        }
    }
}

// One trailing slash at most comes off the endpoint; anything further is
// the caller's to keep.
fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.strip_suffix('/').unwrap_or(endpoint).to_string()
}
