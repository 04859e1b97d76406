use super::point::Point;

use serde::{Deserialize, Serialize};

/// Rectangle of the complex plane, `min` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn real(&self) -> AxisRange {
        AxisRange::new(self.min.x, self.max.x)
    }

    pub fn imaginary(&self) -> AxisRange {
        AxisRange::new(self.min.y, self.max.y)
    }
}

/// Closed interval along one axis. Also the `{min, max}` object echoed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Value of sample `index` out of `count` evenly spaced samples over `[min, max]`.
    ///
    /// A single sample sits on `min`; otherwise the last sample is pinned to `max`
    /// so that rounding never moves the end of the axis.
    pub fn sample(&self, index: usize, count: usize) -> f64 {
        if count <= 1 || index == 0 {
            return self.min;
        }
        if index == count - 1 {
            return self.max;
        }
        let step = (self.max - self.min) / (count - 1) as f64;
        self.min + index as f64 * step
    }

    pub fn samples(&self, count: usize) -> Vec<f64> {
        (0..count).map(|index| self.sample(index, count)).collect()
    }

    /// Whether `echoed` names the same interval, allowing a few ULPs of drift per
    /// bound from a decimal round trip through a node.
    pub fn matches_echo(&self, echoed: &AxisRange) -> bool {
        within_ulps(self.min, echoed.min) && within_ulps(self.max, echoed.max)
    }
}

/// Largest distance, in units in the last place, at which two bounds still agree.
pub const ECHO_TOLERANCE_ULPS: u64 = 4;

fn within_ulps(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    ordered_bits(a).abs_diff(ordered_bits(b)) <= ECHO_TOLERANCE_ULPS
}

/// Maps a float onto an integer line where adjacent floats are adjacent integers.
fn ordered_bits(x: f64) -> i64 {
    let bits = x.to_bits() as i64;
    if bits < 0 {
        i64::MIN - bits
    } else {
        bits
    }
}
