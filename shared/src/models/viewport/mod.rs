use thiserror::Error;

use super::{
    point::Point,
    range::{AxisRange, Range},
    resolution::Resolution,
};

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("{axis} bounds must be finite, got [{min}, {max}]")]
    NonFinite { axis: &'static str, min: f64, max: f64 },

    #[error("{axis} bounds must satisfy min < max, got [{min}, {max}]")]
    EmptyAxis { axis: &'static str, min: f64, max: f64 },

    #[error("resolution must be positive on both axes, got {nx}x{ny}")]
    EmptyResolution { nx: u32, ny: u32 },

    #[error("max_iteration must be at least 1")]
    ZeroIterations,
}

/// The region of the complex plane being rendered and how densely it is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub range: Range,
    pub resolution: Resolution,
    pub max_iteration: u32,
}

impl Viewport {
    pub fn new(
        range: Range,
        resolution: Resolution,
        max_iteration: u32,
    ) -> Result<Self, ViewportError> {
        check_axis("real", range.real())?;
        check_axis("imaginary", range.imaginary())?;
        if resolution.nx == 0 || resolution.ny == 0 {
            return Err(ViewportError::EmptyResolution {
                nx: resolution.nx,
                ny: resolution.ny,
            });
        }
        if max_iteration == 0 {
            return Err(ViewportError::ZeroIterations);
        }

        Ok(Self {
            range,
            resolution,
            max_iteration,
        })
    }

    /// Builds a viewport from the scalar bounds, in the order `min_re, min_im, max_re, max_im`.
    pub fn from_bounds(
        min_re: f64,
        min_im: f64,
        max_re: f64,
        max_im: f64,
        nx: u32,
        ny: u32,
        max_iteration: u32,
    ) -> Result<Self, ViewportError> {
        Self::new(
            Range::new(Point::new(min_re, min_im), Point::new(max_re, max_im)),
            Resolution::new(nx, ny),
            max_iteration,
        )
    }

    pub fn real(&self) -> AxisRange {
        self.range.real()
    }

    pub fn imaginary(&self) -> AxisRange {
        self.range.imaginary()
    }

    pub fn columns(&self) -> usize {
        self.resolution.nx as usize
    }

    pub fn rows(&self) -> usize {
        self.resolution.ny as usize
    }
}

fn check_axis(axis: &'static str, bounds: AxisRange) -> Result<(), ViewportError> {
    let AxisRange { min, max } = bounds;
    if !min.is_finite() || !max.is_finite() {
        return Err(ViewportError::NonFinite { axis, min, max });
    }
    if min >= max {
        return Err(ViewportError::EmptyAxis { axis, min, max });
    }
    Ok(())
}
