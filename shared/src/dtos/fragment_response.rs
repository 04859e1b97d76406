use serde::{Deserialize, Serialize};

use crate::models::{fractal::EscapeCode, range::AxisRange};

/// Successful compute response. `data` is column-major, `col_count × row_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentResponse {
    pub c_real: AxisRange,
    pub c_imag: AxisRange,
    pub data: Vec<Vec<EscapeCode>>,
}

/// Body of every non-success response from a compute node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
}
