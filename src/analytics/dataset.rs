//! Merged dataset and column header reconciliation

use serde::Serialize;

use super::models::{ColumnHeader, Page, ReportQuery, Row};

/// Rows of every fetched page under one append-only header set.
///
/// Every row holds at most `column_headers().len()` cells. Rows shorter
/// than the header set are kept as they are, never padded.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<ReportQuery>,
    column_headers: Vec<ColumnHeader>,
    rows: Vec<Row>,
    total_results: u64,
    items_per_page: u64,
    #[serde(skip)]
    pages: u32,
}

impl MergedDataset {
    /// Start a dataset from the first page of a query
    pub fn seed(page: Page) -> Self {
        let mut dataset = Self {
            total_results: page.total_results,
            items_per_page: page.items_per_page,
            ..Self::default()
        };
        dataset.reconcile(page);
        dataset
    }

    pub(crate) fn with_query(mut self, query: ReportQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Merge one more page into the dataset
    pub(crate) fn reconcile(&mut self, page: Page) {
        reconcile_headers(&mut self.column_headers, &page.column_headers);

        // Cells under a blank header go with it, or every later cell shifts left.
        let blank: Vec<bool> = page.column_headers.iter().map(ColumnHeader::is_blank).collect();

        // Headers only grow, so rows merged earlier already fit the new width.
        let width = self.column_headers.len();
        self.rows.extend(page.rows.into_iter().map(|row| {
            let mut row: Row = row
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !blank.get(*i).copied().unwrap_or(false))
                .map(|(_, cell)| cell)
                .collect();
            row.truncate(width);
            row
        }));
        self.pages += 1;
    }

    pub fn query(&self) -> Option<&ReportQuery> {
        self.query.as_ref()
    }

    pub fn column_headers(&self) -> &[ColumnHeader] {
        &self.column_headers
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.column_headers.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    /// Number of pages merged so far
    pub fn pages(&self) -> u32 {
        self.pages
    }
}

/// Append the non-blank headers of `incoming` that `headers` does not have yet.
///
/// Existing columns keep their index; new ones go to the tail in the order
/// the page declares them. Names are compared and stored trimmed.
pub fn reconcile_headers(headers: &mut Vec<ColumnHeader>, incoming: &[ColumnHeader]) {
    for header in incoming.iter().filter(|h| !h.is_blank()) {
        if !headers.iter().any(|existing| existing.key() == header.key()) {
            headers.push(ColumnHeader {
                name: header.key().to_string(),
                ..header.clone()
            });
        }
    }
}
