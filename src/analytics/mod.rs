//! Analytics reporting API module
//!
//! Fetches every page of a report, reconciles differing column headers
//! and recovers from expired tokens mid-fetch.

mod client;
pub mod commands;
mod credentials;
mod dataset;
mod driver;
mod models;
mod request;
mod supervisor;
pub mod traits;

pub use client::AnalyticsClient;
pub use commands::{export_report, run_export_command, ExportOptions, ExportSummary, QueryInput};
pub use credentials::{Credential, EnvFileStore, GoogleTokenRefresher, OAuthSettings};
pub use dataset::{reconcile_headers, MergedDataset};
pub use driver::{PageSnapshots, PaginationDriver};
pub use models::{split_list, ColumnHeader, Page, ReportQuery, Row};
pub use request::PageRequest;
pub use supervisor::{FetchSettings, RefreshSupervisor};
pub use traits::{CredentialSource, PageFetcher};
