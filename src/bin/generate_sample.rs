use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// (country, continent, life expectancy in 1952, GDP per capita in 1952, population in 1952)
const COUNTRIES: [(&str, &str, f64, f64, f64); 10] = [
    ("Afghanistan", "Asia", 28.8, 779.0, 8.4e6),
    ("Japan", "Asia", 63.0, 3217.0, 8.6e7),
    ("India", "Asia", 37.4, 547.0, 3.7e8),
    ("Nigeria", "Africa", 36.3, 1077.0, 3.3e7),
    ("Kenya", "Africa", 42.3, 854.0, 6.5e6),
    ("Brazil", "Americas", 50.9, 2109.0, 5.6e7),
    ("Canada", "Americas", 68.8, 11367.0, 1.4e7),
    ("France", "Europe", 67.4, 7030.0, 4.2e7),
    ("Norway", "Europe", 72.7, 10095.0, 3.3e6),
    ("Australia", "Oceania", 69.1, 10040.0, 8.7e6),
];

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let output_path = "sample_gapminder.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["country", "continent", "year", "life_exp", "pop", "gdp_percap"])?;

    let mut rows = 0usize;
    for &(country, continent, life0, gdp0, pop0) in &COUNTRIES {
        for step in 0..12 {
            let year = 1952 + step * 5;
            let t = step as f64;

            let gdp = gdp0 * (1.0 + 0.02 * rng.gen_range(0.5..1.5_f64)).powf(t * 5.0);
            let life = (life0 + t * rng.gen_range(0.8..2.2) + rng.gen_range(-1.0..1.0)).min(83.0);
            let pop = pop0 * (1.0 + rng.gen_range(0.005..0.03_f64)).powf(t * 5.0);

            // A few blank cells so the imputation path gets exercised.
            let life_cell = if rng.gen_bool(0.02) { String::new() } else { format!("{life:.3}") };

            writer.write_record([
                country.to_string(),
                continent.to_string(),
                year.to_string(),
                life_cell,
                format!("{pop:.0}"),
                format!("{gdp:.4}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows ({} countries) to {output_path}", COUNTRIES.len());
    Ok(())
}
