//! Report query and page models

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;

use crate::config::api;
use crate::error::{ExportError, Result};

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// One row of report cells, positionally aligned to the column headers
pub type Row = Vec<String>;

/// What to fetch: data source, dimensions, metrics and an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    ids: String,
    dimensions: Vec<String>,
    metrics: Vec<String>,
    #[serde(rename = "start-date")]
    start_date: NaiveDate,
    #[serde(rename = "end-date")]
    end_date: NaiveDate,
}

impl ReportQuery {
    /// Validate raw input into a query.
    ///
    /// Dates must be `YYYY-MM-DD`, be real calendar dates and satisfy
    /// `start <= end`.
    pub fn new(
        ids: &str,
        dimensions: &[String],
        metrics: &[String],
        start_date: &str,
        end_date: &str,
    ) -> Result<Self> {
        let start = parse_date("start-date", start_date)?;
        let end = parse_date("end-date", end_date)?;
        if start > end {
            return Err(ExportError::InvalidInput(format!(
                "start-date {} is after end-date {}",
                start, end
            )));
        }
        if ids.trim().is_empty() {
            return Err(ExportError::InvalidInput(
                "report id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            ids: ids.trim().to_string(),
            dimensions: clean_names(dimensions),
            metrics: clean_names(metrics),
            start_date: start,
            end_date: end,
        })
    }

    pub fn ids(&self) -> &str {
        &self.ids
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Query string pairs in the order the API documents them
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ids", self.ids.clone()),
            ("dimensions", self.dimensions.join(api::LIST_SEPARATOR)),
            ("metrics", self.metrics.join(api::LIST_SEPARATOR)),
            ("start-date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end-date", self.end_date.format("%Y-%m-%d").to_string()),
        ]
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    if !DATE_FORMAT.is_match(value) {
        return Err(ExportError::InvalidInput(format!(
            "{} '{}' must be in YYYY-MM-DD format",
            field, value
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ExportError::InvalidInput(format!("{} '{}' is not a calendar date: {}", field, value, e))
    })
}

fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a comma-separated CLI list into names
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(api::LIST_SEPARATOR)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Column header as declared by a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ColumnHeader {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: None,
            data_type: None,
        }
    }

    /// Name used to decide whether two headers are the same column
    pub fn key(&self) -> &str {
        self.name.trim()
    }

    /// Blank or whitespace-only names never count as columns
    pub fn is_blank(&self) -> bool {
        self.key().is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One report page as returned by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub column_headers: Vec<ColumnHeader>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub next_link: Option<String>,
    pub self_link: String,
    pub total_results: u64,
    pub items_per_page: u64,
}

impl Page {
    /// Link to the following page, or `None` on the last page
    pub fn continuation(&self) -> Option<&str> {
        match self.next_link.as_deref() {
            Some(next) if !next.is_empty() && next != self.self_link => Some(next),
            _ => None,
        }
    }

    /// Expected number of pages for the whole result set (at least one)
    pub fn expected_pages(&self) -> u64 {
        if self.items_per_page == 0 {
            return 1;
        }
        self.total_results.div_ceil(self.items_per_page).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn query(start: &str, end: &str) -> Result<ReportQuery> {
        ReportQuery::new(
            "ga:1",
            &names(&["ga:date"]),
            &names(&["ga:users"]),
            start,
            end,
        )
    }

    #[test]
    fn test_query_valid_range() {
        let q = query("2023-01-01", "2023-01-10").unwrap();
        assert_eq!(q.start_date().to_string(), "2023-01-01");
        assert_eq!(q.end_date().to_string(), "2023-01-10");
    }

    #[test]
    fn test_query_same_day_range() {
        assert!(query("2023-01-01", "2023-01-01").is_ok());
    }

    #[test]
    fn test_query_rejects_impossible_date() {
        assert!(matches!(
            query("2023-13-40", "2023-01-10"),
            Err(ExportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_query_rejects_non_date() {
        assert!(matches!(
            query("2023-01-01", "not-a-date"),
            Err(ExportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_query_rejects_unpadded_date() {
        assert!(query("2023-1-01", "2023-01-10").is_err());
    }

    #[test]
    fn test_query_rejects_reversed_range() {
        let err = query("2023-02-01", "2023-01-01").unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn test_query_rejects_empty_ids() {
        let result = ReportQuery::new(" ", &[], &[], "2023-01-01", "2023-01-02");
        assert!(matches!(result, Err(ExportError::InvalidInput(_))));
    }

    #[test]
    fn test_query_pairs_join_lists() {
        let q = ReportQuery::new(
            "ga:1",
            &names(&["ga:date", " ga:city "]),
            &names(&["ga:users", ""]),
            "2023-01-01",
            "2023-01-10",
        )
        .unwrap();
        let pairs = q.query_pairs();
        assert_eq!(pairs[1], ("dimensions", "ga:date,ga:city".to_string()));
        assert_eq!(pairs[2], ("metrics", "ga:users".to_string()));
        assert_eq!(pairs[3], ("start-date", "2023-01-01".to_string()));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), names(&["a", "b", "c"]));
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_column_header_blank() {
        assert!(ColumnHeader::new("  ").is_blank());
        assert!(ColumnHeader::new("").is_blank());
        assert!(!ColumnHeader::new(" ga:date ").is_blank());
        assert_eq!(ColumnHeader::new(" ga:date ").key(), "ga:date");
    }

    #[test]
    fn test_page_deserialize() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "columnHeaders": [
                {"name": "ga:date", "columnType": "DIMENSION", "dataType": "STRING"},
                {"columnType": "METRIC"}
            ],
            "rows": [["20230101", "5"]],
            "selfLink": "https://x/1",
            "nextLink": "https://x/2",
            "totalResults": 3,
            "itemsPerPage": 1
        }))
        .unwrap();
        assert_eq!(page.column_headers.len(), 2);
        assert!(page.column_headers[1].is_blank());
        assert_eq!(page.continuation(), Some("https://x/2"));
        assert_eq!(page.expected_pages(), 3);
    }

    #[test]
    fn test_page_with_null_header_name() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "columnHeaders": [
                {"name": "ga:date"},
                {"name": null, "columnType": "DIMENSION"},
                {"name": "ga:users"}
            ],
            "rows": [["20230101", "x", "5"]],
            "selfLink": "https://x/1",
            "totalResults": 1,
            "itemsPerPage": 1000
        }))
        .unwrap();
        assert_eq!(page.column_headers.len(), 3);
        assert!(page.column_headers[1].is_blank());
        assert_eq!(page.column_headers[2].key(), "ga:users");
    }

    #[test]
    fn test_page_without_rows() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "columnHeaders": [],
            "selfLink": "https://x/1",
            "totalResults": 0,
            "itemsPerPage": 1000
        }))
        .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.continuation(), None);
        assert_eq!(page.expected_pages(), 1);
    }

    #[test]
    fn test_page_missing_self_link_is_rejected() {
        let result: std::result::Result<Page, _> = serde_json::from_value(serde_json::json!({
            "columnHeaders": [],
            "totalResults": 0,
            "itemsPerPage": 1000
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_continuation_equal_to_self_is_last_page() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "columnHeaders": [],
            "selfLink": "https://x/2",
            "nextLink": "https://x/2",
            "totalResults": 2,
            "itemsPerPage": 1
        }))
        .unwrap();
        assert_eq!(page.continuation(), None);
    }
}
