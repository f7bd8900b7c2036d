//! Export command: validate, fetch every page, write the result

use log::{error, info, warn};

use super::client::AnalyticsClient;
use super::credentials::{Credential, EnvFileStore, GoogleTokenRefresher};
use super::driver::{PageSnapshots, PaginationDriver};
use super::models::ReportQuery;
use super::supervisor::{FetchSettings, RefreshSupervisor};
use super::traits::{CredentialSource, PageFetcher};
use crate::activity::ActivityLog;
use crate::cli::Cli;
use crate::error::{ExportError, Result};
use crate::output::{DualFormatWriter, ExportLayout, WriteOutcome};

/// Raw query input, validated before anything is fetched
#[derive(Debug, Clone)]
pub struct QueryInput {
    pub ids: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub start_date: String,
    pub end_date: String,
}

impl QueryInput {
    fn validate(&self) -> Result<ReportQuery> {
        ReportQuery::new(
            &self.ids,
            &self.dimensions,
            &self.metrics,
            &self.start_date,
            &self.end_date,
        )
    }
}

/// Where and how an export runs
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub base_url: String,
    pub settings: FetchSettings,
    pub layout: ExportLayout,
    pub log: ActivityLog,
    pub progress: bool,
}

/// Result of a completed export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub headers: Vec<String>,
    pub rows: usize,
    pub pages: u32,
    pub refreshes: u32,
    pub outcome: WriteOutcome,
}

/// Run one export with the given fetcher and credential source.
///
/// Returns `Ok(None)` when the input is rejected before any request.
/// A dataset that was fetched but could not be written is still a
/// success; the failure shows up in `ExportSummary::outcome`.
pub async fn export_report<F, C>(
    fetcher: F,
    source: C,
    credential: Credential,
    input: &QueryInput,
    options: &ExportOptions,
) -> Result<Option<ExportSummary>>
where
    F: PageFetcher,
    C: CredentialSource,
{
    let query = match input.validate() {
        Ok(query) => query,
        Err(e) => return rejected(e, options),
    };

    let writer = DualFormatWriter::new(options.log.clone());
    let supervisor = RefreshSupervisor::new(
        fetcher,
        source,
        credential,
        &options.settings,
        options.log.clone(),
    );
    let mut driver = PaginationDriver::new(supervisor, &options.base_url, options.settings)
        .with_snapshots(PageSnapshots::new(writer.clone(), options.layout.clone()))
        .with_progress(options.progress);

    let dataset = match driver.run(&query).await {
        Ok(dataset) => dataset,
        Err(e) if !e.is_fatal() => return rejected(e, options),
        Err(e) => {
            error!("Export failed: {}", e);
            options.log.record(format!("Export failed: {}", e));
            return Err(e);
        }
    };

    let outcome = writer.write(&dataset, &options.layout.targets());
    if !outcome.is_complete() {
        warn!("Some export files could not be written");
    }

    Ok(Some(ExportSummary {
        headers: dataset
            .header_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        rows: dataset.rows().len(),
        pages: dataset.pages(),
        refreshes: driver.supervisor().refreshes(),
        outcome,
    }))
}

fn rejected(e: ExportError, options: &ExportOptions) -> Result<Option<ExportSummary>> {
    error!("{}", e);
    options.log.record(e.to_string());
    Ok(None)
}

/// Run the export described by the command line
pub async fn run_export_command(cli: &Cli) -> Result<Option<ExportSummary>> {
    let input = QueryInput {
        ids: cli.ids.clone(),
        dimensions: cli.dimension_list(),
        metrics: cli.metric_list(),
        start_date: cli.start_date.clone(),
        end_date: cli.end_date.clone(),
    };

    let options = ExportOptions {
        base_url: cli.base_url.clone(),
        settings: cli.fetch_settings(),
        layout: ExportLayout::new(&cli.export_dir, &cli.name),
        log: ActivityLog::new(&cli.log_file),
        progress: !cli.quiet,
    };

    let credential = match cli.token.as_deref() {
        Some(token) => Credential::new(token),
        None => {
            warn!("No access token configured, a refresh will be attempted on the first request");
            Credential::new("")
        }
    };

    let refresher = GoogleTokenRefresher::new(cli.oauth_settings())
        .with_store(EnvFileStore::new(&cli.env_file));

    let summary = export_report(
        AnalyticsClient::new(),
        refresher,
        credential,
        &input,
        &options,
    )
    .await?;

    if let Some(summary) = &summary {
        info!(
            "Exported {} rows x {} columns from {} page(s)",
            summary.rows,
            summary.headers.len(),
            summary.pages
        );
    }
    Ok(summary)
}
