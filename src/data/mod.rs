/// Data layer: source schema, columnar model and CSV loading.
///
/// Architecture:
/// ```text
///   dataset.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bind fields by position (schema) → Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  named Scalar / Vector / Categorical columns
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod schema;
