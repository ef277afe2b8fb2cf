//! gapminder-explorer: descriptive statistics, mixed scalar/vector
//! correlation and a linear life-expectancy model over country-year
//! socioeconomic records.
//!
//! ```text
//!   CSV ─► data::loader ─► Dataset ─► analysis::{stats, encoder, correlation}
//!                                         │
//!                                         ▼
//!                            regression::{split, solver, metrics}
//!                                         │
//!                                         ▼
//!                            report::{summary, charts, export}
//! ```

pub mod analysis;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod regression;
pub mod report;

pub use error::{AnalysisError, AnalysisResult};
