//! Dataset persistence
//!
//! Serializes merged datasets to TSV and JSON files and reports which
//! targets were written.

mod json;
mod tsv;
mod writer;

pub use self::json::to_json;
pub use self::tsv::to_tsv;
pub use self::writer::{DualFormatWriter, ExportLayout, ExportTargets, WriteOutcome};
