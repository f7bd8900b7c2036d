//! Capabilities the pagination pipeline depends on

use async_trait::async_trait;

use super::credentials::Credential;
use super::models::Page;
use super::request::PageRequest;
use crate::error::Result;

/// Single-attempt transport for one report page.
///
/// Implementations classify failures as `Unauthorized`, `Transient` or
/// `Malformed` and never retry on their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest, credential: &Credential) -> Result<Page>;
}

/// Source of fresh bearer tokens
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Obtain a new credential, or fail when no usable token is available
    async fn refresh(&self) -> Result<Credential>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch_page(&self, request: &PageRequest, credential: &Credential) -> Result<Page> {
        (**self).fetch_page(request, credential).await
    }
}

#[async_trait]
impl<T: CredentialSource + ?Sized> CredentialSource for &T {
    async fn refresh(&self) -> Result<Credential> {
        (**self).refresh().await
    }
}
