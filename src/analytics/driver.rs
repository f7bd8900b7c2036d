//! Sequential page traversal and merge

use indicatif::ProgressBar;
use log::{debug, info};
use std::collections::HashSet;

use super::dataset::MergedDataset;
use super::models::{Page, ReportQuery};
use super::request::PageRequest;
use super::supervisor::{FetchSettings, RefreshSupervisor};
use super::traits::{CredentialSource, PageFetcher};
use crate::error::{ExportError, Result};
use crate::output::{DualFormatWriter, ExportLayout};
use crate::ui::create_progress_bar;

/// Where per-page snapshots of the dataset-so-far are written
pub struct PageSnapshots {
    writer: DualFormatWriter,
    layout: ExportLayout,
}

impl PageSnapshots {
    pub fn new(writer: DualFormatWriter, layout: ExportLayout) -> Self {
        Self { writer, layout }
    }
}

/// Walks the continuation links of one query and merges every page.
///
/// One driver per query: the page counter and progress bar are not shared.
pub struct PaginationDriver<F, C> {
    supervisor: RefreshSupervisor<F, C>,
    base_url: String,
    settings: FetchSettings,
    snapshots: Option<PageSnapshots>,
    quiet: bool,
}

impl<F: PageFetcher, C: CredentialSource> PaginationDriver<F, C> {
    pub fn new(
        supervisor: RefreshSupervisor<F, C>,
        base_url: impl Into<String>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            supervisor,
            base_url: base_url.into(),
            settings,
            snapshots: None,
            quiet: true,
        }
    }

    /// Persist the dataset-so-far after every merged page
    pub fn with_snapshots(mut self, snapshots: PageSnapshots) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Show a progress bar sized to the expected page count
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.quiet = !enabled;
        self
    }

    pub fn supervisor(&self) -> &RefreshSupervisor<F, C> {
        &self.supervisor
    }

    /// Fetch every page of `query` and return the merged dataset.
    ///
    /// Any error that escapes the supervisor ends the run; no partial
    /// dataset is returned.
    pub async fn run(&mut self, query: &ReportQuery) -> Result<MergedDataset> {
        let request = PageRequest::initial(&self.base_url, query)?;
        debug!("Initial request: {}", request.url());

        let first = self.supervisor.fetch(&request).await?;
        let total_pages = first.expected_pages();
        info!(
            "Report has {} results, about {} page(s)",
            first.total_results, total_pages
        );
        let progress = create_progress_bar(total_pages, self.quiet);

        let result = self.walk(first, query, progress.as_ref()).await;
        if let Some(bar) = progress {
            match &result {
                Ok(_) => bar.finish(),
                Err(_) => bar.abandon(),
            }
        }
        result
    }

    async fn walk(
        &mut self,
        first: Page,
        query: &ReportQuery,
        progress: Option<&ProgressBar>,
    ) -> Result<MergedDataset> {
        let mut visited = HashSet::from([first.self_link.clone()]);
        let mut next = first.continuation().map(str::to_string);
        let mut dataset = MergedDataset::seed(first).with_query(query.clone());
        self.page_done(&dataset, progress);

        while let Some(link) = next {
            if !visited.insert(link.clone()) {
                return Err(ExportError::Malformed(format!(
                    "pagination loops back to {}",
                    link
                )));
            }

            tokio::time::sleep(self.settings.page_delay).await;

            let page = self
                .supervisor
                .fetch(&PageRequest::continuation(&link))
                .await?;
            visited.insert(page.self_link.clone());
            next = page.continuation().map(str::to_string);
            dataset.reconcile(page);
            self.page_done(&dataset, progress);
        }

        info!(
            "Fetched {} page(s), {} rows, {} columns",
            dataset.pages(),
            dataset.rows().len(),
            dataset.column_headers().len()
        );
        Ok(dataset)
    }

    fn page_done(&self, dataset: &MergedDataset, progress: Option<&ProgressBar>) {
        debug!(
            "Merged page {}: {} rows so far",
            dataset.pages(),
            dataset.rows().len()
        );
        if let Some(snapshots) = &self.snapshots {
            let targets = snapshots.layout.page_targets(dataset.pages());
            snapshots.writer.write(dataset, &targets);
        }
        if let Some(bar) = progress {
            bar.inc(1);
        }
    }
}
