use crate::models::fractal::EscapeCode;

/// A node's computed grid for one work unit, column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionResult {
    pub unit_index: usize,
    pub grid: Vec<Vec<EscapeCode>>,
}

impl PartitionResult {
    pub fn new(unit_index: usize, grid: Vec<Vec<EscapeCode>>) -> Self {
        Self { unit_index, grid }
    }

    pub fn columns(&self) -> usize {
        self.grid.len()
    }
}
