// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering for datapoint chains, the catalog and the session history.
//!
//! Everything here is pure presentation: renderers take normalized views of the data and return
//! `String`s, callers decide where to print them.

pub mod listing;
pub mod plot;
pub mod table;
mod text;

pub use listing::{render_history, render_listing, render_pending_warning};
pub use plot::{map_axis, render_plot, PlotError, PlotOptions, PLOT_HEIGHT, PLOT_WIDTH};
pub use table::render_table;

/// A fixed-size, bounds-checked character grid, filled with spaces.
///
/// Writes overwrite (last writer wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
        })
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        self.cells[idx] = ch;
        Ok(())
    }

    /// The row `y` as a string, untrimmed.
    pub fn row(&self, y: usize) -> Result<String, CanvasError> {
        let start = self.index_of(0, y)?;
        Ok(self.cells[start..start + self.width].iter().collect())
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok((y * self.width) + x)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasError};

    #[test]
    fn set_and_get_in_bounds() {
        let mut c = Canvas::new(3, 2).expect("canvas");
        assert_eq!(c.get(1, 0).unwrap(), ' ');
        c.set(1, 0, 'X').unwrap();
        assert_eq!(c.get(1, 0).unwrap(), 'X');
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let mut c = Canvas::new(2, 2).expect("canvas");
        let err = c.set(2, 0, 'X').unwrap_err();
        assert_eq!(
            err,
            CanvasError::OutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            }
        );
        assert_eq!(err.to_string(), "out of bounds: (2,0) for 2x2 canvas");
    }

    #[test]
    fn rows_keep_trailing_spaces() {
        let mut c = Canvas::new(4, 2).expect("canvas");
        c.set(1, 1, 'x').unwrap();
        assert_eq!(c.row(0).unwrap(), "    ");
        assert_eq!(c.row(1).unwrap(), " x  ");
        assert!(c.row(2).is_err());
    }

    #[test]
    fn rejects_area_overflow() {
        let err = Canvas::new(usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            CanvasError::AreaOverflow {
                width: usize::MAX,
                height: 2
            }
        );
    }
}
