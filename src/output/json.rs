//! JSON output

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::analytics::MergedDataset;
use crate::error::Result;

/// Render the dataset as tab-indented JSON
pub fn to_json(dataset: &MergedDataset) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    dataset.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
