//! One-hot encoding of categorical columns and feature concatenation.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::data::model::{Column, ColumnKind, Dataset, VectorColumn};
use crate::error::{AnalysisError, AnalysisResult};

/// Suffix appended to a categorical column name for its encoded column.
pub const ENCODED_SUFFIX: &str = "Encoded";

/// Name of the encoded column produced for `source`.
pub fn encoded_name(source: &str) -> String {
    format!("{source}{ENCODED_SUFFIX}")
}

// ---------------------------------------------------------------------------
// EncodingMap – category value ↔ vector slot
// ---------------------------------------------------------------------------

/// Category → slot bijection for one column, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingMap {
    column: String,
    categories: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl EncodingMap {
    /// Build the map from every value supplied.
    pub fn fit(column: &str, values: &[String]) -> Self {
        let mut categories = Vec::new();
        let mut index = HashMap::new();
        for v in values {
            if !index.contains_key(v) {
                index.insert(v.clone(), categories.len());
                categories.push(v.clone());
            }
        }
        EncodingMap {
            column: column.to_string(),
            categories,
            index,
        }
    }

    /// Source column this map was fit on.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn slot_of(&self, value: &str) -> AnalysisResult<usize> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// One-hot encode a whole column.
    pub fn encode(&self, values: &[String]) -> AnalysisResult<VectorColumn> {
        let width = self.width();
        let mut flat = vec![0.0; values.len() * width];
        for (row, v) in values.iter().enumerate() {
            flat[row * width + self.slot_of(v)?] = 1.0;
        }
        VectorColumn::new(self.categories.clone(), flat)
    }
}

// ---------------------------------------------------------------------------
// Dataset-level transforms
// ---------------------------------------------------------------------------

/// Fit one [`EncodingMap`] per categorical column over all rows of `dataset`
/// and append a `<name>Encoded` vector column for each. Source columns are
/// kept as they are.
pub fn fit_transform(
    dataset: &Dataset,
    categorical: &[&str],
) -> AnalysisResult<(Dataset, Vec<EncodingMap>)> {
    let maps = categorical
        .iter()
        .map(|&name| Ok(EncodingMap::fit(name, dataset.get_categorical(name)?)))
        .collect::<AnalysisResult<Vec<_>>>()?;
    let expanded = transform(dataset, &maps)?;
    Ok((expanded, maps))
}

/// Apply previously fit maps. Values absent from a map are an error.
pub fn transform(dataset: &Dataset, maps: &[EncodingMap]) -> AnalysisResult<Dataset> {
    let mut out = dataset.clone();
    for map in maps {
        let encoded = map.encode(dataset.get_categorical(map.column())?)?;
        debug!("Encoded '{}' into {} slots", map.column(), map.width());
        out = out.with_column(&encoded_name(map.column()), Column::Vector(encoded))?;
    }
    Ok(out)
}

/// Horizontally concatenate `inputs` (scalar or vector columns) into a new
/// vector column `output`. Slot order follows `inputs`, and within a vector
/// input its own slot order; slot names are `source[slot]` for vector
/// inputs and the column name for scalars.
pub fn concat_features(dataset: &Dataset, inputs: &[&str], output: &str) -> AnalysisResult<Dataset> {
    let mut parts = Vec::with_capacity(inputs.len());
    let mut slot_names = Vec::new();
    for &name in inputs {
        let column = dataset.column(name)?;
        match column {
            Column::Scalar(_) => slot_names.push(name.to_string()),
            Column::Vector(v) => {
                slot_names.extend(v.slot_names().iter().map(|s| format!("{name}[{s}]")))
            }
            Column::Categorical(_) => {
                return Err(AnalysisError::ColumnTypeMismatch {
                    name: name.to_string(),
                    expected: ColumnKind::Vector,
                    actual: ColumnKind::Categorical,
                })
            }
        }
        parts.push(column);
    }

    let width = slot_names.len();
    let mut flat = Vec::with_capacity(dataset.len() * width);
    for row in 0..dataset.len() {
        for column in &parts {
            match column {
                Column::Scalar(v) => flat.push(v[row]),
                Column::Vector(v) => flat.extend_from_slice(v.row(row)),
                Column::Categorical(_) => {}
            }
        }
    }

    debug!("Concatenated {} inputs into '{output}' ({width} slots)", inputs.len());
    dataset.with_column(output, Column::Vector(VectorColumn::new(slot_names, flat)?))
}
