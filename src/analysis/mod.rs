/// Statistical engines over a [`Dataset`](crate::data::model::Dataset).
///
/// ```text
///   Dataset ──► encoder ──► Dataset + EncodingMaps (+ Features column)
///      │                        │
///      ▼                        ▼
///    stats                  correlation
///  (describe, impute)     (column / component matrices)
/// ```

pub mod correlation;
pub mod encoder;
pub mod stats;
