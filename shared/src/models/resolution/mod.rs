/// Sample counts along each axis: `nx` columns (real axis) by `ny` rows (imaginary axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub nx: u32,
    pub ny: u32,
}

impl Resolution {
    pub fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny }
    }

    pub fn points(&self) -> u64 {
        self.nx as u64 * self.ny as u64
    }
}
