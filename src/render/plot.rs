// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scatter plot of one chain on a fixed character grid.
//!
//! Points are rescaled linearly onto the grid, with row 0 at the top. A cell hit by one point
//! shows [`POINT_GLYPH`], a cell hit by several shows [`OVERLAP_GLYPH`].

use crate::model::DataPoint;

use super::text::{axis_label, center};
use super::{Canvas, CanvasError};

pub const PLOT_WIDTH: usize = 66;
pub const PLOT_HEIGHT: usize = 11;
pub const POINT_GLYPH: char = 'x';
pub const OVERLAP_GLYPH: char = 'X';

const X_TICK_SPACING: usize = 13;
const Y_LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub width: usize,
    pub height: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlotError {
    #[error("no datapoint with two readable coordinates")]
    NoPlottablePoints,
    #[error("plot area {width}x{height} is too small")]
    InvalidSize { width: usize, height: usize },
    #[error("{0}")]
    Canvas(#[from] CanvasError),
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    fn of(points: &[(f64, f64)]) -> Option<Self> {
        let (first_x, first_y) = *points.first()?;
        let init = Self {
            min_x: first_x,
            max_x: first_x,
            min_y: first_y,
            max_y: first_y,
        };
        Some(points.iter().fold(init, |b, &(x, y)| Self {
            min_x: b.min_x.min(x),
            max_x: b.max_x.max(x),
            min_y: b.min_y.min(y),
            max_y: b.max_y.max(y),
        }))
    }
}

/// Maps `value` onto a column in `0..cells`.
///
/// A degenerate range (`min == max`) maps every value to column 0.
pub fn map_axis(value: f64, min: f64, max: f64, cells: usize) -> usize {
    let span = max - min;
    if cells <= 1 || span == 0.0 || !span.is_finite() {
        return 0;
    }
    let last = (cells - 1) as f64;
    ((value - min) / span * last).round().clamp(0.0, last) as usize
}

/// Maps `value` onto a row in `0..cells`, the largest value landing on row 0.
///
/// A degenerate range maps every value to row 0.
pub fn map_row(value: f64, min: f64, max: f64, cells: usize) -> usize {
    let span = max - min;
    if cells <= 1 || span == 0.0 || !span.is_finite() {
        return 0;
    }
    let last = (cells - 1) as f64;
    (last - (value - min) / span * last).round().clamp(0.0, last) as usize
}

/// Renders `points` under a one-line `title`.
///
/// Points whose coordinates do not normalize are skipped; the plot fails only when none is left.
pub fn render_plot(
    points: &[DataPoint],
    title: &str,
    options: PlotOptions,
) -> Result<String, PlotError> {
    let PlotOptions { width, height } = options;
    if width == 0 || height == 0 {
        return Err(PlotError::InvalidSize { width, height });
    }

    let values = points
        .iter()
        .filter_map(DataPoint::to_f64_pair)
        .collect::<Vec<_>>();
    let skipped = points.len() - values.len();
    if skipped > 0 {
        tracing::warn!(skipped, "skipping datapoints that do not normalize");
    }
    let bounds = Bounds::of(&values).ok_or(PlotError::NoPlottablePoints)?;

    let mut grid = Canvas::new(width, height)?;
    for &(x, y) in &values {
        let col = map_axis(x, bounds.min_x, bounds.max_x, width);
        let row = map_row(y, bounds.min_y, bounds.max_y, height);
        let glyph = match grid.get(col, row)? {
            ' ' => POINT_GLYPH,
            _ => OVERLAP_GLYPH,
        };
        grid.set(col, row, glyph)?;
    }

    let mut lines = Vec::with_capacity(height + 4);
    lines.push(format!("{:>w$} {title}", "", w = Y_LABEL_WIDTH));
    lines.push(format!("{:>w$} ^", "", w = Y_LABEL_WIDTH));

    let y_step = if height > 1 {
        (bounds.max_y - bounds.min_y) / (height - 1) as f64
    } else {
        0.0
    };
    for row in 0..height {
        let cells = grid.row(row)?;
        if row % 2 == 0 {
            let label = format!("{:.3}", bounds.max_y - row as f64 * y_step);
            lines.push(format!("{label:>w$} +{cells}", w = Y_LABEL_WIDTH));
        } else {
            lines.push(format!("{:>w$} |{cells}", "", w = Y_LABEL_WIDTH));
        }
    }

    let rule = (0..width)
        .map(|col| if col % X_TICK_SPACING == 0 { '+' } else { '-' })
        .collect::<String>();
    lines.push(format!("{:>w$}  {rule}>", "", w = Y_LABEL_WIDTH));

    let x_step = if width > 1 {
        (bounds.max_x - bounds.min_x) / (width - 1) as f64
    } else {
        0.0
    };
    let labels = (0..width.div_ceil(X_TICK_SPACING))
        .map(|tick| {
            let value = bounds.min_x + (tick * X_TICK_SPACING) as f64 * x_step;
            center(&axis_label(value), X_TICK_SPACING)
        })
        .collect::<String>();
    lines.push(format!("{:>4}  {labels}", ""));

    Ok(lines.join("\n"))
}
