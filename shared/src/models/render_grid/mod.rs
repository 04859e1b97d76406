use super::{fractal::EscapeCode, resolution::Resolution};

/// The stitched output of a render, column-major: `columns[x][y]`.
///
/// Column `x` holds the codes for real-axis sample `x`, row `y` the imaginary-axis
/// sample `y`, both in ascending order of their axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGrid {
    resolution: Resolution,
    columns: Vec<Vec<EscapeCode>>,
}

impl RenderGrid {
    /// Only the stitcher builds grids; it has already checked that the shape is rectangular.
    pub fn from_columns(resolution: Resolution, columns: Vec<Vec<EscapeCode>>) -> Self {
        debug_assert_eq!(columns.len(), resolution.nx as usize);
        debug_assert!(columns.iter().all(|c| c.len() == resolution.ny as usize));
        Self {
            resolution,
            columns,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.resolution.nx as usize
    }

    pub fn height(&self) -> usize {
        self.resolution.ny as usize
    }

    pub fn column(&self, x: usize) -> Option<&[EscapeCode]> {
        self.columns.get(x).map(Vec::as_slice)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<EscapeCode> {
        self.columns.get(x).and_then(|column| column.get(y)).copied()
    }

    pub fn columns(&self) -> &[Vec<EscapeCode>] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Vec<EscapeCode>> {
        self.columns
    }
}
