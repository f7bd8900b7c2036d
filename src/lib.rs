//! uaexport - Export Universal Analytics reports
//!
//! Fetches a paginated report from the Core Reporting API, merges pages
//! whose column sets differ, refreshes the OAuth token when it expires
//! mid-fetch, and writes the result as TSV and JSON.
//!
//! # Features
//!
//! - Sequential page walk following continuation links
//! - Append-only column header reconciliation across pages
//! - Bounded retry with token refresh per page request
//! - Per-page snapshots for crash recovery
//! - Timestamped activity log of refreshes, failures and writes
//!
//! # Example
//!
//! ```bash
//! # Export January 2023 with the default dimensions and metrics
//! uaexport --start-date 2023-01-01 --end-date 2023-01-31
//!
//! # Custom columns into another directory
//! uaexport --start-date 2023-01-01 --end-date 2023-01-10 \
//!     --dimensions ga:date --metrics ga:users,ga:sessions --export-dir out
//! ```

pub mod activity;
pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod ui;

pub use activity::ActivityLog;
pub use analytics::{
    export_report, run_export_command, AnalyticsClient, ColumnHeader, Credential,
    CredentialSource, ExportOptions, ExportSummary, FetchSettings, GoogleTokenRefresher,
    MergedDataset, Page, PageFetcher, PageRequest, PaginationDriver, QueryInput, ReportQuery,
};
pub use cli::Cli;
pub use error::{ExportError, Result};
pub use output::{DualFormatWriter, ExportLayout, ExportTargets, WriteOutcome};
