use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Fill for cells and points without a meaningful value.
pub const NEUTRAL: RGBColor = RGBColor(160, 160, 160);

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> RGBColor {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| hsl_to_rgb((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale for correlations
// ---------------------------------------------------------------------------

/// Blue for −1, white for 0, red for +1; [`NEUTRAL`] for NaN.
pub fn correlation_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return NEUTRAL;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 220.0 } else { 0.0 };
    hsl_to_rgb(hue, 0.75, 1.0 - 0.5 * r.abs())
}

// ---------------------------------------------------------------------------
// Color mapping: category → RGBColor
// ---------------------------------------------------------------------------

/// Maps the categories of a column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, RGBColor>,
}

impl ColorMap {
    /// Build a colour map from the values of a categorical column.
    pub fn new(values: &[String]) -> Self {
        let mut unique: Vec<&String> = values.iter().collect();
        unique.sort();
        unique.dedup();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Legend entries (category → colour), sorted by category.
    pub fn legend_entries(&self) -> Vec<(String, RGBColor)> {
        self.mapping.iter().map(|(v, c)| (v.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        for i in 0..5 {
            for j in (i + 1)..5 {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_correlation_scale() {
        let white = correlation_color(0.0);
        assert!(white.0 > 250 && white.1 > 250 && white.2 > 250);
        let red = correlation_color(1.0);
        assert!(red.0 > red.2);
        let blue = correlation_color(-1.0);
        assert!(blue.2 > blue.0);
        assert_eq!(correlation_color(f64::NAN), NEUTRAL);
    }

    #[test]
    fn test_color_map_legend() {
        let values: Vec<String> = ["Europe", "Asia", "Europe"].iter().map(|s| s.to_string()).collect();
        let entries = ColorMap::new(&values).legend_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Asia");
        assert_eq!(entries[1].0, "Europe");
        assert_ne!(entries[0].1, entries[1].1);
    }
}
