use complex_rs::complex::Complex;
use rayon::prelude::*;

use super::{EscapeCode, ESCAPE_MODULUS, NO_ESCAPE};

/// Squared escape radius, |z| > 2.
const ESCAPE_RADIUS_SQ: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mandelbrot {
    pub max_iteration: u32,
}

impl Mandelbrot {
    pub fn new(max_iteration: u32) -> Self {
        Self { max_iteration }
    }

    /// Iterates `z <- z² + c` from `z = 0` and reports the iteration at which |z| > 2,
    /// modulo 256, or [`NO_ESCAPE`] if that never happens within `max_iteration` steps.
    pub fn escape_code(&self, c: Complex) -> EscapeCode {
        let mut z = Complex::ZERO;

        for iteration in 1..=self.max_iteration {
            z = z.square() + c;
            if z.arg_sq() > ESCAPE_RADIUS_SQ {
                return (iteration % ESCAPE_MODULUS) as EscapeCode;
            }
        }

        NO_ESCAPE
    }

    /// Evaluates every point of `re_samples × im_samples`.
    ///
    /// The grid is column-major: `grid[i][j]` is the code for `re_samples[i] + im_samples[j]·i`.
    /// Columns are spread over the rayon pool; points share no state so the result is the
    /// same as a sequential sweep.
    pub fn compute(&self, re_samples: &[f64], im_samples: &[f64]) -> Vec<Vec<EscapeCode>> {
        re_samples
            .par_iter()
            .map(|&re| {
                im_samples
                    .iter()
                    .map(|&im| self.escape_code(Complex::new(re, im)))
                    .collect()
            })
            .collect()
    }
}
