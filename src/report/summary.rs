use std::fmt::Write;

use super::Report;

/// Printable `(key, value)` pairs for the console summary.
pub fn key_values(report: &Report) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("Rows".to_string(), report.overview.row_count.to_string()),
        ("Columns".to_string(), report.overview.column_count.to_string()),
        (
            "Distinct countries".to_string(),
            report.overview.distinct_countries.to_string(),
        ),
        (
            "Distinct continents".to_string(),
            report.overview.distinct_continents.to_string(),
        ),
    ];

    for s in &report.summaries {
        pairs.push((format!("{} mean", s.column), format_number(s.summary.mean)));
        pairs.push((format!("{} std dev", s.column), format_number(s.summary.std_dev)));
        if s.summary.valid_count < s.summary.count {
            pairs.push((
                format!("{} imputed", s.column),
                (s.summary.count - s.summary.valid_count).to_string(),
            ));
        }
    }

    pairs.push((
        "Train / test rows".to_string(),
        format!("{} / {}", report.train_rows, report.test_rows),
    ));
    pairs.push(("RMSE".to_string(), format_number(report.metrics.rmse)));
    pairs.push(("MAE".to_string(), format_number(report.metrics.mae)));
    pairs.push(("R^2".to_string(), format_number(report.metrics.r_squared)));
    pairs
}

/// Aligned `key: value` block.
pub fn render(report: &Report) -> String {
    let pairs = key_values(report);
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in pairs {
        let _ = writeln!(out, "{key:<width$}  {value}");
    }
    out
}

fn format_number(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else if v.abs() >= 1e6 {
        format!("{v:.4e}")
    } else {
        format!("{v:.4}")
    }
}
