//! End-to-end tests for the analysis pipeline.

use std::io::Write;

use gapminder_explorer::analysis::correlation::correlation_matrix;
use gapminder_explorer::config::RunConfig;
use gapminder_explorer::data::model::{Column, Dataset, Record, VectorColumn};
use gapminder_explorer::data::schema::{LIFE_EXP, YEAR};
use gapminder_explorer::pipeline::{self, FEATURES};
use gapminder_explorer::regression::{evaluate, fit, train_test_split, SolverOptions};
use gapminder_explorer::report::export;
use gapminder_explorer::AnalysisError;

fn exact_solver() -> SolverOptions {
    SolverOptions {
        l2_penalty: 0.0,
        max_iterations: 10_000,
        tolerance: 1e-24,
    }
}

/// Life expectancy with a feature vector `[x, 1]` where `life = 60 + 2x`.
fn linear_dataset() -> Dataset {
    let life = vec![70.0, 72.0, 75.0, 68.0, 80.0];
    let flat: Vec<f64> = life.iter().flat_map(|y| [(y - 60.0) / 2.0, 1.0]).collect();
    Dataset::from_columns(vec![
        (
            FEATURES.to_string(),
            Column::Vector(VectorColumn::new(vec!["x".into(), "one".into()], flat).unwrap()),
        ),
        (LIFE_EXP.to_string(), Column::Scalar(life)),
    ])
    .unwrap()
}

fn synthetic_records() -> Vec<Record> {
    let countries = [
        ("Chad", "Africa", 38.0, 1100.0),
        ("Kenya", "Africa", 42.0, 850.0),
        ("Japan", "Asia", 63.0, 3200.0),
        ("India", "Asia", 37.0, 550.0),
        ("Peru", "Americas", 44.0, 3750.0),
        ("Canada", "Americas", 68.0, 11400.0),
        ("France", "Europe", 67.0, 7000.0),
        ("Norway", "Europe", 72.0, 10100.0),
    ];
    let mut records = Vec::new();
    for (i, &(country, continent, life0, gdp0)) in countries.iter().enumerate() {
        for step in 0..5 {
            let t = step as f64;
            records.push(Record {
                country: country.to_string(),
                continent: continent.to_string(),
                year: 1952.0 + 5.0 * t,
                life_exp: life0 + 1.5 * t + (i % 3) as f64 * 0.1,
                pop: 1.0e6 * (i + 1) as f64 * (1.0 + 0.1 * t),
                gdp_percap: gdp0 * (1.0 + 0.15 * t),
            });
        }
    }
    // a couple of data-quality problems
    records[3].life_exp = f64::NAN;
    records[7].year = 0.0;
    records
}

fn quiet_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.charts.enabled = false;
    config.export_json = false;
    config.seed = 3;
    config
}

#[test]
fn test_perfect_linear_fit_scores_perfectly() {
    let ds = linear_dataset();
    let (train, test) = train_test_split(&ds, 0.4, 11).unwrap();
    assert_eq!(test.len(), 2);
    assert_eq!(train.len(), 3);

    let model = fit(&train, FEATURES, LIFE_EXP, &exact_solver()).unwrap();
    let metrics = evaluate(&model, &test, FEATURES, LIFE_EXP).unwrap();
    assert!(metrics.rmse < 1e-6, "rmse = {}", metrics.rmse);
    assert!(metrics.mae < 1e-6);
    assert!((metrics.r_squared - 1.0).abs() < 1e-6);
}

#[test]
fn test_identical_held_out_point() {
    let ds = linear_dataset();
    let model = fit(&ds.take_rows(&[0, 1, 3, 4]), FEATURES, LIFE_EXP, &exact_solver()).unwrap();
    let held_out = ds.take_rows(&[2]);
    let metrics = evaluate(&model, &held_out, FEATURES, LIFE_EXP).unwrap();
    assert!(metrics.rmse < 1e-6);
    // a single label has no spread: degenerate R² policy
    assert_eq!(metrics.r_squared, 0.0);
}

#[test]
fn test_constant_test_labels() {
    let ds = linear_dataset();
    let model = fit(&ds, FEATURES, LIFE_EXP, &exact_solver()).unwrap();

    let flat = vec![1.0, 1.0, 2.0, 1.0, 3.0, 1.0];
    let constant = Dataset::from_columns(vec![
        (
            FEATURES.to_string(),
            Column::Vector(VectorColumn::new(vec!["x".into(), "one".into()], flat).unwrap()),
        ),
        (LIFE_EXP.to_string(), Column::Scalar(vec![70.0; 3])),
    ])
    .unwrap();
    let metrics = evaluate(&model, &constant, FEATURES, LIFE_EXP).unwrap();
    assert_eq!(metrics.r_squared, 0.0);
    assert!(metrics.rmse.is_finite());
}

#[test]
fn test_empty_test_set() {
    let ds = linear_dataset();
    let (train, test) = train_test_split(&ds, 0.0, 1).unwrap();
    let model = fit(&train, FEATURES, LIFE_EXP, &exact_solver()).unwrap();
    let err = evaluate(&model, &test, FEATURES, LIFE_EXP).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyTestSet));
}

#[test]
fn test_analyze_synthetic_dataset() {
    let records = synthetic_records();
    let ds = Dataset::from_records(&records);
    let config = quiet_config();
    let report = pipeline::analyze(&ds, &config).unwrap();

    assert_eq!(report.overview.row_count, 40);
    assert_eq!(report.overview.distinct_countries, 8);
    assert_eq!(report.overview.distinct_continents, 4);
    assert_eq!(report.test_rows, 8);
    assert_eq!(report.train_rows, 32);

    let year = report.summary(YEAR).unwrap();
    assert_eq!(year.valid_count, 39);
    let life = report.summary(LIFE_EXP).unwrap();
    assert_eq!(life.valid_count, 39);

    // 8 countries + 4 continents + year, pop, gdp
    assert_eq!(report.model.weights.len(), 15);
    assert!(report.model.weights.iter().all(|w| w.is_finite()));
    assert!(report.metrics.rmse.is_finite());
    assert!(report.metrics.r_squared > 0.0, "r² = {}", report.metrics.r_squared);

    let corr = &report.correlation;
    assert_eq!(corr.labels(), config.correlation_columns.as_slice());
    assert!(corr.is_symmetric(1e-12));
    for i in 0..corr.size() {
        assert_eq!(corr.get(i, i), 1.0);
    }
    // country (width 8) and continent (width 4) blocks cannot be paired
    assert!(corr.get_by_label("CountryEncoded", "ContinentEncoded").unwrap().is_nan());
    assert_eq!(corr.undefined_pairs().len(), 1);

    assert_eq!(report.distributions.life_exp.len(), 40);
    assert!(report.distributions.life_exp.iter().all(|v| v.is_finite()));
    assert_eq!(report.distributions.year_counts.len(), 5);
    assert_eq!(report.scatter.groups.len(), 40);
}

#[test]
fn test_analysis_is_reproducible() {
    let ds = Dataset::from_records(&synthetic_records());
    let config = quiet_config();
    let a = pipeline::analyze(&ds, &config).unwrap();
    let b = pipeline::analyze(&ds, &config).unwrap();
    assert_eq!(a.model, b.model);
    assert_eq!(a.metrics, b.metrics);
}

#[test]
fn test_correlation_of_encoded_dataset() {
    let ds = Dataset::from_records(&synthetic_records());
    let cleaned = pipeline::impute_numeric(&ds).unwrap();
    let (expanded, _) = pipeline::build_features(&cleaned).unwrap();

    let m = correlation_matrix(&expanded, &["Year", "LifeExp", "ContinentEncoded"]).unwrap();
    assert_eq!(m.size(), 3);
    assert!(m.get(0, 1) > 0.0);
    assert!(m.undefined_pairs().is_empty());
}

#[test]
fn test_run_writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("gapminder.csv");
    let mut file = std::fs::File::create(&input).expect("create");
    writeln!(file, "country,continent,year,lifeExp,pop,gdpPercap").unwrap();
    for r in synthetic_records() {
        let life = if r.life_exp.is_nan() { String::new() } else { r.life_exp.to_string() };
        writeln!(
            file,
            "{},{},{},{},{},{}",
            r.country, r.continent, r.year, life, r.pop, r.gdp_percap
        )
        .unwrap();
    }
    drop(file);

    let mut config = quiet_config();
    config.input = input;
    config.output_dir = dir.path().join("out");
    config.export_json = true;

    let report = pipeline::run(&config).unwrap();
    assert_eq!(report.overview.row_count, 40);

    let json_path = config.output_dir.join(export::REPORT_JSON);
    let text = std::fs::read_to_string(json_path).expect("report.json");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["overview"]["row_count"], 40);
    assert!(value["metrics"]["rmse"].is_number());
    assert_eq!(value["encodings"][1]["categories"].as_array().unwrap().len(), 4);
    // the undefined correlation cell is exported as null
    assert!(value["correlation"]["values"][1].is_null());
}

#[test]
fn test_run_missing_input() {
    let mut config = quiet_config();
    config.input = "/no/such/file.csv".into();
    assert!(pipeline::run(&config).is_err());
}
