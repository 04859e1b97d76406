pub mod mandelbrot;

/// Per-point kernel output. `0..=255` is the escape iteration modulo 256,
/// [`NO_ESCAPE`] means the orbit stayed bounded for the whole iteration budget.
pub type EscapeCode = u16;

pub const ESCAPE_MODULUS: u32 = 256;

pub const NO_ESCAPE: EscapeCode = 256;

pub fn is_valid_escape_code(code: EscapeCode) -> bool {
    code <= NO_ESCAPE
}
