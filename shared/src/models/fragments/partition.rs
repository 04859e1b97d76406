use crate::{models::viewport::Viewport, networking::NodeAddress};

use super::work_unit::WorkUnit;

/// A contiguous block of real-axis sample indices, before it is given to a node.
///
/// Boundaries are sample indices into the viewport's real axis; `re_start` and
/// `re_end` are the values of the first and last sample of the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    pub index: usize,
    pub col_offset: usize,
    pub col_count: usize,
    pub re_start: f64,
    pub re_end: f64,
}

impl Partition {
    /// Sample indices covered by this partition.
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.col_offset..self.col_offset + self.col_count
    }

    pub fn assign(self, viewport: &Viewport, node: NodeAddress) -> WorkUnit {
        let imaginary = viewport.imaginary();
        WorkUnit {
            index: self.index,
            col_offset: self.col_offset,
            re_start: self.re_start,
            re_end: self.re_end,
            col_count: self.col_count as u32,
            min_im: imaginary.min,
            max_im: imaginary.max,
            row_count: viewport.resolution.ny,
            max_iteration: viewport.max_iteration,
            node,
        }
    }
}
