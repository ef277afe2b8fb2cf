use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use super::model::{Dataset, Record};
use super::schema::{header_matches, SemanticType, GAPMINDER_SCHEMA};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a gapminder CSV file into a columnar [`Dataset`].
///
/// Fields are bound by position following [`GAPMINDER_SCHEMA`]; header names
/// are only checked loosely and a mismatch is logged, not rejected.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let records = read_records(file).with_context(|| format!("reading {}", path.display()))?;
    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(Dataset::from_records(&records))
}

/// Parse gapminder records from any reader. Empty or unparseable numeric
/// cells become NaN.
pub fn read_records<R: Read>(input: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    if headers.len() != GAPMINDER_SCHEMA.len() {
        bail!(
            "Expected {} columns ({}), found {}",
            GAPMINDER_SCHEMA.len(),
            GAPMINDER_SCHEMA.map(|f| f.header).join(", "),
            headers.len()
        );
    }
    for (found, field) in headers.iter().zip(GAPMINDER_SCHEMA.iter()) {
        if !header_matches(found, field.header) {
            warn!("Header '{found}' bound to field '{}' by position", field.header);
        }
    }

    let mut records = Vec::new();
    let mut invalid_cells = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut text = Vec::with_capacity(2);
        let mut numbers = Vec::with_capacity(4);
        for (field, cell) in GAPMINDER_SCHEMA.iter().zip(record.iter()) {
            match field.kind {
                SemanticType::Category => text.push(cell.trim().to_string()),
                SemanticType::Number => {
                    let value = parse_number(cell);
                    if value.is_nan() {
                        debug!("Row {row_no}: '{}' = '{cell}' read as NaN", field.header);
                        invalid_cells += 1;
                    }
                    numbers.push(value);
                }
            }
        }

        let [country, continent]: [String; 2] = text
            .try_into()
            .map_err(|_| anyhow::anyhow!("Row {row_no}: schema must have two text fields"))?;
        let [year, life_exp, pop, gdp_percap]: [f64; 4] = numbers
            .try_into()
            .map_err(|_| anyhow::anyhow!("Row {row_no}: schema must have four numeric fields"))?;

        records.push(Record {
            country,
            continent,
            year,
            life_exp,
            pop,
            gdp_percap,
        });
    }

    if invalid_cells > 0 {
        warn!("{invalid_cells} numeric cells were empty or invalid and read as NaN");
    }
    Ok(records)
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}
