use serde::{Deserialize, Serialize};

/// Parameters of one compute request, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentQuery {
    pub min_re: f64,
    pub min_im: f64,
    pub max_re: f64,
    pub max_im: f64,
    pub col_count: u32,
    pub row_count: u32,
    pub max_iter: u32,
}

impl FragmentQuery {
    pub const FIELDS: [&'static str; 7] = [
        "min_re",
        "min_im",
        "max_re",
        "max_im",
        "col_count",
        "row_count",
        "max_iter",
    ];

    /// Query-string pairs. Floats use `Display`, which round-trips exactly and never
    /// switches to exponent notation.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.min_re.to_string(),
            self.min_im.to_string(),
            self.max_re.to_string(),
            self.max_im.to_string(),
            self.col_count.to_string(),
            self.row_count.to_string(),
            self.max_iter.to_string(),
        ];
        Self::FIELDS.into_iter().zip(values).collect()
    }

    pub fn points(&self) -> u64 {
        self.col_count as u64 * self.row_count as u64
    }
}
