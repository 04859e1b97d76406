use crate::{dtos::fragment_query::FragmentQuery, models::range::AxisRange, networking::NodeAddress};

/// One node's share of a render: a column slice of the real axis over the full imaginary span.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkUnit {
    pub index: usize,
    pub col_offset: usize,
    pub re_start: f64,
    pub re_end: f64,
    pub col_count: u32,
    pub min_im: f64,
    pub max_im: f64,
    pub row_count: u32,
    pub max_iteration: u32,
    pub node: NodeAddress,
}

impl WorkUnit {
    pub fn real(&self) -> AxisRange {
        AxisRange::new(self.re_start, self.re_end)
    }

    pub fn imaginary(&self) -> AxisRange {
        AxisRange::new(self.min_im, self.max_im)
    }

    /// The public parameters a compute node needs, without the routing information.
    pub fn query(&self) -> FragmentQuery {
        FragmentQuery {
            min_re: self.re_start,
            min_im: self.min_im,
            max_re: self.re_end,
            max_im: self.max_im,
            col_count: self.col_count,
            row_count: self.row_count,
            max_iter: self.max_iteration,
        }
    }
}
