pub mod fractal;
pub mod fragments;
pub mod point;
pub mod range;
pub mod render_grid;
pub mod resolution;
pub mod viewport;
