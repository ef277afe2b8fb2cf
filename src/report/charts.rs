//! PNG rendering of the report series.
//!
//! File names are fixed per chart so repeated runs overwrite the same set:
//! `life_exp_dist.png`, `gdp_per_capita_dist.png`, `pop_dist.png`,
//! `year_dist.png`, `gdp_vs_life_exp.png`, `correlation_heatmap.png`.

use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;

use super::{Report, Scatter};
use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::stats;
use crate::color::{correlation_color, ColorMap};
use crate::config::ChartOptions;
use crate::error::{AnalysisError, AnalysisResult};

pub const LIFE_EXP_DIST: &str = "life_exp_dist.png";
pub const GDP_PERCAP_DIST: &str = "gdp_per_capita_dist.png";
pub const POP_DIST: &str = "pop_dist.png";
pub const YEAR_DIST: &str = "year_dist.png";
pub const GDP_VS_LIFE_EXP: &str = "gdp_vs_life_exp.png";
pub const CORRELATION_HEATMAP: &str = "correlation_heatmap.png";

const BAR: RGBColor = RGBColor(31, 119, 180);
const CAPTION_SIZE: u32 = 20;

fn chart_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Chart(e.to_string())
}

/// Render every chart of `report` into `dir`, returning the written paths.
pub fn render_all(report: &Report, dir: &Path, options: &ChartOptions) -> AnalysisResult<Vec<PathBuf>> {
    let d = &report.distributions;
    let mut written = Vec::with_capacity(6);

    let histograms = [
        (LIFE_EXP_DIST, "Life expectancy distribution", "Life expectancy", &d.life_exp),
        (GDP_PERCAP_DIST, "GDP per capita distribution", "GDP per capita", &d.gdp_percap),
        (POP_DIST, "Population distribution", "Population", &d.pop),
    ];
    for (file, title, x_desc, values) in histograms {
        let path = dir.join(file);
        histogram_chart(&path, title, x_desc, values, options)?;
        written.push(path);
    }

    let path = dir.join(YEAR_DIST);
    year_chart(&path, &d.year_counts, options)?;
    written.push(path);

    let path = dir.join(GDP_VS_LIFE_EXP);
    scatter_chart(&path, &report.scatter, options)?;
    written.push(path);

    let path = dir.join(CORRELATION_HEATMAP);
    heatmap_chart(&path, &report.correlation, options)?;
    written.push(path);

    for p in &written {
        info!("Wrote {}", p.display());
    }
    Ok(written)
}

fn histogram_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    values: &[f64],
    options: &ChartOptions,
) -> AnalysisResult<()> {
    let hist = stats::histogram(values, options.histogram_bins);
    let (lo, hi) = match (hist.edges.first(), hist.edges.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0.0, 1.0),
    };
    let max_count = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", CAPTION_SIZE).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0.0..max_count * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Frequency")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                BAR.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn year_chart(path: &Path, counts: &[(f64, usize)], options: &ChartOptions) -> AnalysisResult<()> {
    let first = counts.first().map(|c| c.0).unwrap_or(0.0);
    let last = counts.last().map(|c| c.0).unwrap_or(1.0);
    let gap = counts
        .windows(2)
        .map(|w| w[1].0 - w[0].0)
        .fold(f64::INFINITY, f64::min);
    let gap = if gap.is_finite() && gap > 0.0 { gap } else { 1.0 };
    let half_bar = gap * 0.4;
    let max_count = counts.iter().map(|c| c.1).max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Rows per year", ("sans-serif", CAPTION_SIZE).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((first - gap)..(last + gap), 0.0..max_count * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Count")
        .x_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(counts.iter().map(|&(year, n)| {
            Rectangle::new([(year - half_bar, 0.0), (year + half_bar, n as f64)], BAR.filled())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn scatter_chart(path: &Path, scatter: &Scatter, options: &ChartOptions) -> AnalysisResult<()> {
    let range = |v: &[f64]| {
        let lo = v.iter().copied().filter(|x| x.is_finite()).fold(f64::INFINITY, f64::min);
        let hi = v.iter().copied().filter(|x| x.is_finite()).fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi > lo {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        } else if lo.is_finite() {
            (lo - 1.0)..(lo + 1.0)
        } else {
            0.0..1.0
        }
    };

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let title = format!("{} vs {}", scatter.x_label, scatter.y_label);
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", CAPTION_SIZE).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(range(scatter.x.as_slice()), range(scatter.y.as_slice()))
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(scatter.x_label.as_str())
        .y_desc(scatter.y_label.as_str())
        .draw()
        .map_err(chart_err)?;

    let colors = ColorMap::new(&scatter.groups);
    for (group, color) in colors.legend_entries() {
        let points = scatter
            .x
            .iter()
            .zip(&scatter.y)
            .zip(&scatter.groups)
            .filter(|(_, g)| **g == group)
            .map(|((&x, &y), _)| Circle::new((x, y), 2, color.filled()));
        chart
            .draw_series(points)
            .map_err(chart_err)?
            .label(group.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn heatmap_chart(path: &Path, matrix: &CorrelationMatrix, options: &ChartOptions) -> AnalysisResult<()> {
    let n = matrix.size();
    let labels = matrix.labels();

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation matrix", ("sans-serif", CAPTION_SIZE).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(130)
        .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())
        .map_err(chart_err)?;

    // Row 0 is drawn at the top.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) if *i < n => labels[n - 1 - *i].clone(),
            _ => String::new(),
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
            let y = n - 1 - i;
            Rectangle::new(
                [
                    (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
                ],
                correlation_color(matrix.get(i, j)).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
