use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Grid dimensions measured in cells. Both axes are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDims", into = "RawDims")]
pub struct GridDims {
    rows: u16,
    cols: u16,
}

impl GridDims {
    pub fn new(rows: u16, cols: u16) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Clamp a requested span so it never exceeds the grid on either axis.
    /// Zero spans are read as one.
    pub fn clamp_span(&self, span: Span) -> Span {
        Span::new(
            span.rows.clamp(1, self.rows),
            span.cols.clamp(1, self.cols),
        )
    }
}

impl Default for GridDims {
    /// The stock 2x2 display grid.
    fn default() -> Self {
        Self { rows: 2, cols: 2 }
    }
}

#[derive(Serialize, Deserialize)]
struct RawDims {
    rows: u16,
    cols: u16,
}

impl TryFrom<RawDims> for GridDims {
    type Error = LayoutError;

    fn try_from(raw: RawDims) -> Result<Self> {
        GridDims::new(raw.rows, raw.cols)
    }
}

impl From<GridDims> for RawDims {
    fn from(dims: GridDims) -> Self {
        Self {
            rows: dims.rows,
            cols: dims.cols,
        }
    }
}

/// Number of rows and columns a zone occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub rows: u16,
    pub cols: u16,
}

impl Span {
    pub const UNIT: Span = Span { rows: 1, cols: 1 };

    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    pub fn is_unit(&self) -> bool {
        self.rows <= 1 && self.cols <= 1
    }

    pub fn area(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// Rectangle of grid cells anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Footprint {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl Footprint {
    pub const fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    pub fn at(row: usize, col: usize, span: Span) -> Self {
        Self::new(row, col, span.rows as usize, span.cols as usize)
    }

    /// One past the last covered row.
    pub fn bottom(&self) -> usize {
        self.row + self.row_span
    }

    /// One past the last covered column.
    pub fn right(&self) -> usize {
        self.col + self.col_span
    }

    pub fn area(&self) -> usize {
        self.row_span * self.col_span
    }

    pub fn span(&self) -> Span {
        Span::new(self.row_span as u16, self.col_span as u16)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.bottom() && col >= self.col && col < self.right()
    }

    pub fn fits_within(&self, dims: GridDims) -> bool {
        self.bottom() <= dims.rows() && self.right() <= dims.cols()
    }

    /// Covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.bottom()).flat_map(move |r| (self.col..self.right()).map(move |c| (r, c)))
    }
}
