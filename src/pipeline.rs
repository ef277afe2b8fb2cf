use anyhow::{Context, Result};
use log::info;

use crate::analysis::correlation::correlation_matrix;
use crate::analysis::encoder::{self, EncodingMap};
use crate::analysis::stats::{self, Validity};
use crate::config::RunConfig;
use crate::data::loader;
use crate::data::model::{Column, Dataset};
use crate::data::schema::{CONTINENT, COUNTRY, GDP_PERCAP, LIFE_EXP, POP, YEAR};
use crate::error::AnalysisResult;
use crate::regression::{self, split};
use crate::report::{
    charts, export, summary, ColumnSummary, Distributions, Overview, Report, Scatter,
};

// ---------------------------------------------------------------------------
// Fixed layout of the gapminder analysis
// ---------------------------------------------------------------------------

/// Columns one-hot encoded before modelling.
pub const CATEGORICAL: [&str; 2] = [COUNTRY, CONTINENT];

/// Name of the concatenated feature column.
pub const FEATURES: &str = "Features";

/// Inputs of [`FEATURES`], in slot order. Model weights follow this order.
pub const FEATURE_INPUTS: [&str; 5] = ["CountryEncoded", "ContinentEncoded", YEAR, POP, GDP_PERCAP];

/// Regression target.
pub const LABEL: &str = LIFE_EXP;

/// Numeric columns with the rule deciding which of their values are valid.
pub const NUMERIC_COLUMNS: [(&str, Validity); 4] = [
    (YEAR, Validity::PositiveFinite),
    (LIFE_EXP, Validity::Finite),
    (POP, Validity::Finite),
    (GDP_PERCAP, Validity::Finite),
];

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Counts and per-column summaries of the raw dataset.
pub fn describe_dataset(dataset: &Dataset) -> AnalysisResult<(Overview, Vec<ColumnSummary>)> {
    let overview = Overview {
        row_count: dataset.len(),
        column_count: dataset.column_count(),
        distinct_countries: stats::distinct_count(dataset.get_categorical(COUNTRY)?),
        distinct_continents: stats::distinct_count(dataset.get_categorical(CONTINENT)?),
    };

    let summaries = NUMERIC_COLUMNS
        .iter()
        .map(|&(column, validity)| {
            Ok(ColumnSummary {
                column: column.to_string(),
                validity,
                summary: stats::describe(dataset.get_scalar(column)?, validity),
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok((overview, summaries))
}

/// New dataset whose numeric columns have invalid entries replaced by the
/// column mean.
pub fn impute_numeric(dataset: &Dataset) -> AnalysisResult<Dataset> {
    let mut cleaned = dataset.clone();
    for (column, validity) in NUMERIC_COLUMNS {
        let imputed = stats::impute_mean(dataset.get_scalar(column)?, validity);
        cleaned = cleaned.with_column(column, Column::Scalar(imputed))?;
    }
    Ok(cleaned)
}

/// Encode the categorical columns and append the [`FEATURES`] column.
pub fn build_features(cleaned: &Dataset) -> AnalysisResult<(Dataset, Vec<EncodingMap>)> {
    let (encoded, maps) = encoder::fit_transform(cleaned, &CATEGORICAL)?;
    let with_features = encoder::concat_features(&encoded, &FEATURE_INPUTS, FEATURES)?;
    Ok((with_features, maps))
}

/// Run the whole analysis on an in-memory dataset.
pub fn analyze(dataset: &Dataset, config: &RunConfig) -> AnalysisResult<Report> {
    config.validate()?;

    let (overview, summaries) = describe_dataset(dataset)?;
    info!(
        "{} rows, {} countries, {} continents",
        overview.row_count, overview.distinct_countries, overview.distinct_continents
    );

    let cleaned = impute_numeric(dataset)?;
    let (expanded, encodings) = build_features(&cleaned)?;
    let features = expanded.get_vector(FEATURES)?;
    info!("Feature vector has {} slots", features.width());

    let requested: Vec<&str> = config.correlation_columns.iter().map(String::as_str).collect();
    let correlation = correlation_matrix(&expanded, &requested)?;

    let (train, test) = split::train_test_split(&expanded, config.test_fraction, config.seed)?;
    let model = regression::fit(&train, FEATURES, LABEL, &config.solver)?;
    let metrics = regression::evaluate(&model, &test, FEATURES, LABEL)?;
    info!(
        "RMSE {:.4}, MAE {:.4}, R² {:.4} on {} test rows",
        metrics.rmse, metrics.mae, metrics.r_squared, metrics.n_observations
    );

    let distributions = Distributions {
        life_exp: cleaned.get_scalar(LIFE_EXP)?.to_vec(),
        gdp_percap: cleaned.get_scalar(GDP_PERCAP)?.to_vec(),
        pop: cleaned.get_scalar(POP)?.to_vec(),
        year_counts: stats::value_counts(cleaned.get_scalar(YEAR)?),
    };
    let scatter = Scatter {
        x_label: "GDP per capita".to_string(),
        y_label: "Life expectancy".to_string(),
        x: cleaned.get_scalar(GDP_PERCAP)?.to_vec(),
        y: cleaned.get_scalar(LIFE_EXP)?.to_vec(),
        groups: cleaned.get_categorical(CONTINENT)?.to_vec(),
    };

    Ok(Report {
        overview,
        summaries,
        encodings,
        distributions,
        scatter,
        correlation,
        model,
        metrics,
        train_rows: train.len(),
        test_rows: test.len(),
    })
}

/// Load the configured input, analyze it and emit the summary, charts and
/// JSON report.
pub fn run(config: &RunConfig) -> Result<Report> {
    config.validate()?;
    let dataset = loader::load_csv(&config.input)?;
    let report = analyze(&dataset, config).context("analysis failed")?;

    print!("{}", summary::render(&report));

    let dir = &config.output_dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    if config.charts.enabled {
        charts::render_all(&report, dir, &config.charts).context("rendering charts")?;
    }
    if config.export_json {
        export::write_json(&report, &dir.join(export::REPORT_JSON)).context("writing report")?;
    }
    Ok(report)
}
