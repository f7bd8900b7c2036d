//! Bounded retry with token refresh around page fetches

use log::{error, info, warn};
use std::time::Duration;

use super::credentials::Credential;
use super::models::Page;
use super::request::PageRequest;
use super::traits::{CredentialSource, PageFetcher};
use crate::activity::ActivityLog;
use crate::config::defaults;
use crate::error::{ExportError, Result};

/// Retry budget and pauses of a fetch session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Re-attempts allowed per page request
    pub max_retries: u32,
    /// Pause before each continuation request
    pub page_delay: Duration,
    /// Pause after a successful token refresh
    pub refresh_cooldown: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            page_delay: defaults::PAGE_DELAY,
            refresh_cooldown: defaults::REFRESH_COOLDOWN,
        }
    }
}

impl FetchSettings {
    /// No pauses, same retry budget (tests)
    pub fn without_delays() -> Self {
        Self {
            page_delay: Duration::ZERO,
            refresh_cooldown: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Owns the current credential and retries a failed page step after
/// refreshing it.
///
/// Only the failing request is repeated; pages already merged are never
/// fetched again.
pub struct RefreshSupervisor<F, C> {
    fetcher: F,
    source: C,
    credential: Credential,
    max_retries: u32,
    cooldown: Duration,
    log: ActivityLog,
    refreshes: u32,
}

impl<F: PageFetcher, C: CredentialSource> RefreshSupervisor<F, C> {
    pub fn new(
        fetcher: F,
        source: C,
        credential: Credential,
        settings: &FetchSettings,
        log: ActivityLog,
    ) -> Self {
        Self {
            fetcher,
            source,
            credential,
            max_retries: settings.max_retries,
            cooldown: settings.refresh_cooldown,
            log,
            refreshes: 0,
        }
    }

    /// Credential used for the next attempt
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Successful refreshes in this session
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// Fetch one page, refreshing the token and retrying on
    /// `Unauthorized`/`Transient` until the budget is spent.
    pub async fn fetch(&mut self, request: &PageRequest) -> Result<Page> {
        let mut retries_left = self.max_retries;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let err = match self.fetcher.fetch_page(request, &self.credential).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() => e,
                Err(e) => {
                    error!("Page request failed: {}", e);
                    self.log
                        .record(format!("Page request failed ({}): {}", request.url(), e));
                    return Err(e);
                }
            };

            warn!("Page request failed (attempt {}): {}", attempts, err);
            self.log.record(format!(
                "Page request failed (attempt {}, {}): {}",
                attempts,
                request.url(),
                err
            ));

            if retries_left == 0 {
                let message = format!("Failed after {} attempts", attempts);
                error!("{}", message);
                self.log.record(&message);
                return Err(ExportError::RetriesExhausted {
                    attempts,
                    last_error: err.to_string(),
                });
            }

            self.credential = match self.source.refresh().await {
                Ok(credential) => credential,
                Err(e) => {
                    let message = format!("Failed to refresh the token: {}", e);
                    error!("{}", message);
                    self.log.record(&message);
                    return Err(match e {
                        ExportError::AuthRefreshFailed(_) => e,
                        other => ExportError::AuthRefreshFailed(other.to_string()),
                    });
                }
            };
            self.refreshes += 1;

            let expiry = self
                .credential
                .expires_at()
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string());
            let message = format!("Token refreshed, attempting to continue. New expiry: {}", expiry);
            info!("{}", message);
            self.log.record(&message);

            tokio::time::sleep(self.cooldown).await;
            retries_left -= 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Scripted fetcher and credential source shared by pipeline tests

    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays scripted results and records every request it receives
    #[derive(Default)]
    pub struct ScriptedFetcher {
        script: Mutex<VecDeque<Result<Page>>>,
        fallback: Option<fn() -> ExportError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedFetcher {
        pub fn new(script: Vec<Result<Page>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                ..Self::default()
            }
        }

        /// Fails with `make_error()` on every call once the script runs out
        pub fn failing_with(make_error: fn() -> ExportError) -> Self {
            Self {
                fallback: Some(make_error),
                ..Self::default()
            }
        }

        /// (url, token) of every call
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, request: &PageRequest, credential: &Credential) -> Result<Page> {
            self.calls.lock().unwrap().push((
                request.url().to_string(),
                credential.access_token().to_string(),
            ));
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => Err(self.fallback.map(|f| f()).unwrap_or_else(|| {
                    ExportError::Malformed("scripted fetcher ran out of pages".to_string())
                })),
            }
        }
    }

    /// Hands out `token-1`, `token-2`, ... or always fails
    pub struct CountingSource {
        succeed: bool,
        calls: Mutex<u32>,
    }

    impl CountingSource {
        pub fn succeeding() -> Self {
            Self {
                succeed: true,
                calls: Mutex::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                succeed: false,
                calls: Mutex::new(0),
            }
        }

        pub fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CredentialSource for CountingSource {
        async fn refresh(&self) -> Result<Credential> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.succeed {
                Ok(Credential::expiring_in(format!("token-{}", *calls), 3600))
            } else {
                Err(ExportError::AuthRefreshFailed("no token returned".to_string()))
            }
        }
    }

    pub fn page(self_link: &str, next_link: Option<&str>, headers: &[&str], rows: &[&[&str]]) -> Page {
        Page {
            column_headers: headers
                .iter()
                .map(|h| crate::analytics::models::ColumnHeader::new(h))
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            next_link: next_link.map(str::to_string),
            self_link: self_link.to_string(),
            total_results: 0,
            items_per_page: 0,
        }
    }
}
