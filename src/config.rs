// src/config.rs
use serde::Deserialize;
use thiserror::Error;

use crate::jellyfin::{Client, ClientError};

pub const ENDPOINT_VAR: &str = "JELLYFIN_ENDPOINT";
pub const USERNAME_VAR: &str = "JELLYFIN_USERNAME";
pub const PASSWORD_VAR: &str = "JELLYFIN_PASSWORD";

/// Connection settings. An explicit non-empty value wins; otherwise the
/// matching environment variable is consulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing Jellyfin endpoint: set it explicitly or via the {ENDPOINT_VAR} environment variable")]
    MissingEndpoint,

    #[error("missing Jellyfin username: set it explicitly or via the {USERNAME_VAR} environment variable")]
    MissingUsername,

    #[error("missing Jellyfin password: set it explicitly or via the {PASSWORD_VAR} environment variable")]
    MissingPassword,
}

impl Config {
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    fn resolve_with<F>(self, env: F) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint =
            pick(self.endpoint, ENDPOINT_VAR, &env).ok_or(ConfigError::MissingEndpoint)?;
        let username =
            pick(self.username, USERNAME_VAR, &env).ok_or(ConfigError::MissingUsername)?;
        let password =
            pick(self.password, PASSWORD_VAR, &env).ok_or(ConfigError::MissingPassword)?;

        Ok(ResolvedConfig {
            endpoint,
            username,
            password,
        })
    }
}

fn pick<F>(explicit: Option<String>, var: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|value| !value.is_empty())
        .or_else(|| env(var).filter(|value| !value.is_empty()))
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl ResolvedConfig {
    /// Authenticate and build a ready-to-use client.
    pub async fn connect(&self) -> Result<Client, ClientError> {
        Client::with_auth(&self.endpoint, &self.username, &self.password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let config = Config {
            endpoint: Some("http://explicit:8096".to_string()),
            username: Some("explicit-user".to_string()),
            password: Some("explicit-pass".to_string()),
        };
        let env = env_of(&[
            (ENDPOINT_VAR, "http://env:8096"),
            (USERNAME_VAR, "env-user"),
            (PASSWORD_VAR, "env-pass"),
        ]);

        let resolved = config.resolve_with(env).unwrap();

        assert_eq!(resolved.endpoint, "http://explicit:8096");
        assert_eq!(resolved.username, "explicit-user");
        assert_eq!(resolved.password, "explicit-pass");
    }

    #[test]
    fn environment_fills_missing_fields() {
        let config = Config {
            endpoint: Some("http://explicit:8096".to_string()),
            ..Config::default()
        };
        let env = env_of(&[(USERNAME_VAR, "env-user"), (PASSWORD_VAR, "env-pass")]);

        let resolved = config.resolve_with(env).unwrap();

        assert_eq!(resolved.endpoint, "http://explicit:8096");
        assert_eq!(resolved.username, "env-user");
        assert_eq!(resolved.password, "env-pass");
    }

    #[test]
    fn empty_explicit_value_falls_back_to_environment() {
        let config = Config {
            endpoint: Some(String::new()),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
        };
        let env = env_of(&[(ENDPOINT_VAR, "http://env:8096")]);

        let resolved = config.resolve_with(env).unwrap();

        assert_eq!(resolved.endpoint, "http://env:8096");
    }

    #[test]
    fn each_missing_field_reports_its_own_error() {
        let env = env_of(&[]);
        let err = Config::default().resolve_with(&env).unwrap_err();
        assert_eq!(err, ConfigError::MissingEndpoint);

        let err = Config {
            endpoint: Some("http://localhost:8096".to_string()),
            ..Config::default()
        }
        .resolve_with(&env)
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingUsername);

        let err = Config {
            endpoint: Some("http://localhost:8096".to_string()),
            username: Some("user".to_string()),
            ..Config::default()
        }
        .resolve_with(&env)
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingPassword);
    }

    #[test]
    fn errors_name_the_environment_variable() {
        let message = ConfigError::MissingEndpoint.to_string();
        assert!(message.contains("JELLYFIN_ENDPOINT"), "got: {message}");
    }
}
