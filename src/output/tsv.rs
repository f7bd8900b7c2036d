//! Tab-separated output

use crate::analytics::MergedDataset;
use crate::config::export::DELIMITER;

/// Render the dataset as delimited text.
///
/// Values are written verbatim (no quoting). A row shorter than the
/// header gets empty trailing fields so every line has the same width.
pub fn to_tsv(dataset: &MergedDataset) -> String {
    let delimiter = DELIMITER.to_string();
    let width = dataset.column_headers().len();

    let mut out = dataset.header_names().join(&delimiter);
    out.push('\n');

    for row in dataset.rows() {
        let mut line = row.join(&delimiter);
        for _ in row.len()..width {
            line.push(DELIMITER);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}
