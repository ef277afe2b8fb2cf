use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;

use super::Report;
use crate::error::AnalysisResult;

pub const REPORT_JSON: &str = "report.json";

/// Write the report as pretty JSON. Undefined numbers (NaN) become `null`.
pub fn write_json(report: &Report, path: &Path) -> AnalysisResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    info!("Wrote {}", path.display());
    Ok(())
}
