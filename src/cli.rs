use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::RunConfig;

/// Exploratory statistics and a life-expectancy regression over a
/// gapminder-style CSV.
#[derive(Debug, Parser)]
#[command(name = "gapminder-explorer", version, about)]
pub struct Cli {
    /// Input CSV (country, continent, year, life_exp, pop, gdp_percap)
    pub input: Option<PathBuf>,

    /// JSON config file; command line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the charts and report.json
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Share of rows held out for evaluation
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Seed of the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip PNG rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Skip report.json
    #[arg(long)]
    pub no_json: bool,
}

impl Cli {
    /// Effective configuration: file (or defaults) with flags applied on top.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.no_charts {
            config.charts.enabled = false;
        }
        if self.no_json {
            config.export_json = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gapminder-explorer",
            "data/gapminder.csv",
            "--seed",
            "9",
            "--test-fraction",
            "0.3",
            "--no-charts",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.input, PathBuf::from("data/gapminder.csv"));
        assert_eq!(config.seed, 9);
        assert_eq!(config.test_fraction, 0.3);
        assert!(!config.charts.enabled);
        assert!(config.export_json);
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let config = Cli::try_parse_from(["gapminder-explorer"])
            .unwrap()
            .into_config()
            .unwrap();
        assert_eq!(config, RunConfig::default());
    }
}
