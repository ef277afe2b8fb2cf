/// Train/test partitioning, linear model fitting and evaluation.
///
/// ```text
///   Dataset ──► split ──► (train, test)
///                            │      │
///                            ▼      │
///                         solver    │
///                        (Model)    │
///                            │      ▼
///                            └──► metrics (RMSE, MAE, R²)
/// ```

pub mod metrics;
pub mod solver;
pub mod split;

pub use metrics::{evaluate, Metrics};
pub use solver::{fit, Model, SolverOptions};
pub use split::train_test_split;
