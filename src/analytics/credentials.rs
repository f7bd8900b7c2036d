//! Bearer credentials and OAuth token refresh

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::traits::CredentialSource;
use crate::config::env;
use crate::error::{ExportError, Result};

/// Bearer token plus its expiry, replaced wholesale on refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Token with unknown expiry (e.g. read from the environment)
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Token that expires `expires_in` seconds from now
    pub fn expiring_in(access_token: impl Into<String>, expires_in: u64) -> Self {
        let seconds = i64::try_from(expires_in).unwrap_or(i64::MAX);
        Self {
            access_token: access_token.into(),
            expires_at: Utc::now().checked_add_signed(ChronoDuration::seconds(seconds)),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// `Authorization` header value
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// OAuth client settings used to obtain new access tokens
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub grant_type: String,
}

/// Token endpoint response
#[derive(Deserialize, Debug)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Refreshes the access token against the OAuth token endpoint and
/// persists it to the env file for future runs.
pub struct GoogleTokenRefresher {
    client: Client,
    settings: OAuthSettings,
    store: Option<EnvFileStore>,
}

impl GoogleTokenRefresher {
    pub fn new(settings: OAuthSettings) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            settings,
            store: None,
        }
    }

    /// Persist every refreshed token into the given env file
    pub fn with_store(mut self, store: EnvFileStore) -> Self {
        self.store = Some(store);
        self
    }

    fn form_body(&self) -> String {
        [
            ("client_id", &self.settings.client_id),
            ("client_secret", &self.settings.client_secret),
            ("refresh_token", &self.settings.refresh_token),
            ("grant_type", &self.settings.grant_type),
        ]
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
    }
}

#[async_trait]
impl CredentialSource for GoogleTokenRefresher {
    async fn refresh(&self) -> Result<Credential> {
        debug!("Refreshing access token at {}", self.settings.token_url);

        let response = self
            .client
            .post(&self.settings.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(self.form_body())
            .send()
            .await
            .map_err(|e| ExportError::AuthRefreshFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::AuthRefreshFailed(format!(
                "token endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExportError::AuthRefreshFailed(e.to_string()))?;

        let (access_token, expires_in) = match (token.access_token, token.expires_in) {
            (Some(t), Some(e)) if !t.is_empty() && e > 0 => (t, e),
            _ => {
                return Err(ExportError::AuthRefreshFailed(
                    "token endpoint returned no usable access token or expiry".to_string(),
                ))
            }
        };

        info!("New token expiry: {}s", expires_in);

        if let Some(store) = &self.store {
            if let Err(e) = store.set(env::CURRENT_TOKEN, &access_token) {
                warn!("Could not persist refreshed token: {}", e);
            }
        }

        Ok(Credential::expiring_in(access_token, expires_in))
    }
}

/// Reads and rewrites `KEY=value` lines of a dotenv file
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the line for `key`, or append one if missing.
    /// Uses atomic write (tmp file + rename).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(ExportError::Credentials(format!(
                    "Failed to read env file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let entry = format!("{}={}", key, value);
        let prefix = format!("{}=", key);
        let mut replaced = false;
        let mut lines: Vec<String> = content
            .lines()
            .map(|line| {
                if !replaced && line.trim_start().starts_with(&prefix) {
                    replaced = true;
                    entry.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(entry);
        }

        let mut output = lines.join("\n");
        output.push('\n');

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, output).map_err(|e| {
            ExportError::Credentials(format!(
                "Failed to write temp env file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            ExportError::Credentials(format!(
                "Failed to rename temp env file to {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Updated {} in {}", key, self.path.display());
        Ok(())
    }
}
