//! Paired box-plot drawing
//!
//! One chart per variable: for every evaluation round the two cohorts get a
//! box (quartiles, median, 1.5·IQR whiskers, outlier markers) side by side,
//! plus a solid median trend line and a dashed least-squares trend per
//! cohort. Generic over the drawing backend so PNG and SVG share one path.

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use trialstat_stats::summarize;

use crate::PlotError;

const BOX_HALF_WIDTH: f64 = 0.14;
const WHISKER_HALF_WIDTH: f64 = 0.07;
const TREND_DASHES: usize = 24;

/// One cohort's values per round, plus its visual placement
pub(crate) struct GroupSeries<'a> {
    pub name: &'a str,
    pub color: RGBColor,
    pub offset: f64,
    pub per_round: Vec<Vec<f64>>,
}

fn render_err<E: std::fmt::Display>(error: E) -> PlotError {
    PlotError::Render(error.to_string())
}

pub(crate) fn draw_variable<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    variable: &str,
    rounds: &[String],
    groups: &[GroupSeries<'_>; 2],
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(render_err)?;

    let (y_min, y_max) = y_range(groups);
    let k = rounds.len() as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(
            format!("{} by evaluation round", variable),
            ("sans-serif", 22),
        )
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(56)
        .build_cartesian_2d(-0.6..(k - 0.4), y_min..y_max)
        .map_err(render_err)?;

    let labels: Vec<String> = rounds.to_vec();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rounds.len())
        .x_label_formatter(&move |x: &f64| {
            let idx = x.round() as isize;
            if (x - idx as f64).abs() < 0.05 && idx >= 0 && (idx as usize) < labels.len() {
                format!("T{}", labels[idx as usize])
            } else {
                String::new()
            }
        })
        .x_desc("Evaluation round")
        .y_desc(variable)
        .draw()
        .map_err(render_err)?;

    for group in groups {
        for (slot, values) in group.per_round.iter().enumerate() {
            if !values.is_empty() {
                draw_box(&mut chart, slot as f64 + group.offset, values, group.color)?;
            }
        }
    }

    for group in groups {
        draw_trends(&mut chart, group)?;
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()
        .map_err(render_err)?;

    Ok(())
}

/// One box with whiskers at 1.5·IQR fences and outlier markers beyond them
fn draw_box<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: f64,
    values: &[f64],
    color: RGBColor,
) -> Result<(), PlotError> {
    let summary = summarize(values);
    let lo_fence = summary.q1 - 1.5 * summary.iqr();
    let hi_fence = summary.q3 + 1.5 * summary.iqr();
    let whisker_lo = values
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence)
        .fold(f64::INFINITY, f64::min);
    let whisker_hi = values
        .iter()
        .copied()
        .filter(|v| *v <= hi_fence)
        .fold(f64::NEG_INFINITY, f64::max);

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [
                (x - BOX_HALF_WIDTH, summary.q1),
                (x + BOX_HALF_WIDTH, summary.q3),
            ],
            color.mix(0.35).filled(),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [
                (x - BOX_HALF_WIDTH, summary.q1),
                (x + BOX_HALF_WIDTH, summary.q3),
            ],
            color.stroke_width(1),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![
                (x - BOX_HALF_WIDTH, summary.median),
                (x + BOX_HALF_WIDTH, summary.median),
            ],
            color.stroke_width(2),
        )))
        .map_err(render_err)?;

    for (from, to) in [(whisker_lo, summary.q1), (summary.q3, whisker_hi)] {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, from), (x, to)],
                color.stroke_width(1),
            )))
            .map_err(render_err)?;
    }
    for y in [whisker_lo, whisker_hi] {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x - WHISKER_HALF_WIDTH, y), (x + WHISKER_HALF_WIDTH, y)],
                color.stroke_width(1),
            )))
            .map_err(render_err)?;
    }

    chart
        .draw_series(
            values
                .iter()
                .filter(|v| **v < lo_fence || **v > hi_fence)
                .map(|v| Circle::new((x, *v), 3, color.mix(0.5).filled())),
        )
        .map_err(render_err)?;

    Ok(())
}

/// Median trend line with markers and a dashed least-squares overlay
fn draw_trends<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    group: &GroupSeries<'_>,
) -> Result<(), PlotError> {
    let points: Vec<(f64, f64)> = group
        .per_round
        .iter()
        .enumerate()
        .filter(|(_, values)| !values.is_empty())
        .map(|(slot, values)| (slot as f64 + group.offset, summarize(values).median))
        .collect();

    if points.len() < 2 {
        return Ok(());
    }

    let color = group.color;
    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
        .map_err(render_err)?
        .label(format!("{} (median)", group.name))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));
    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
        )
        .map_err(render_err)?;

    if let Some((slope, intercept)) = linear_fit(&points) {
        let x0 = points[0].0;
        let x1 = points[points.len() - 1].0;
        let from = (x0, slope * x0 + intercept);
        let to = (x1, slope * x1 + intercept);
        for segment in dash_segments(from, to) {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    segment.to_vec(),
                    color.mix(0.7).stroke_width(1),
                )))
                .map_err(render_err)?;
        }
    }

    Ok(())
}

/// Least-squares line through the points; `None` below two distinct x values
fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

fn dash_segments(from: (f64, f64), to: (f64, f64)) -> Vec<[(f64, f64); 2]> {
    let lerp = |t: f64| {
        (
            from.0 + t * (to.0 - from.0),
            from.1 + t * (to.1 - from.1),
        )
    };
    (0..TREND_DASHES)
        .step_by(2)
        .map(|i| {
            let t0 = i as f64 / TREND_DASHES as f64;
            let t1 = (i + 1) as f64 / TREND_DASHES as f64;
            [lerp(t0), lerp(t1)]
        })
        .collect()
}

fn y_range(groups: &[GroupSeries<'_>; 2]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for group in groups {
        for values in &group.per_round {
            for value in values {
                min = min.min(*value);
                max = max.max(*value);
            }
        }
    }
    if min > max {
        return (0.0, 1.0);
    }
    let pad = if max > min { 0.05 * (max - min) } else { 1.0 };
    (min - pad, max + pad)
}
