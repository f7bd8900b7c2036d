//! Per-attempt request descriptors

use reqwest::Url;

use super::models::ReportQuery;
use crate::error::{ExportError, Result};

/// Immutable description of one page request.
///
/// Built fresh for every page; a retry re-sends the same descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    url: String,
}

impl PageRequest {
    /// First-page request: base endpoint plus the URL-encoded query
    pub fn initial(base_url: &str, query: &ReportQuery) -> Result<Self> {
        let params = query
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", base_url, params);
        Url::parse(&url)
            .map_err(|e| ExportError::InvalidInput(format!("invalid URL '{}': {}", url, e)))?;

        Ok(Self { url })
    }

    /// Continuation request; the upstream link is used verbatim
    pub fn continuation(link: &str) -> Self {
        Self {
            url: link.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
