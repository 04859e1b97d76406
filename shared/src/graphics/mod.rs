pub mod color;

use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};
use log::info;

use crate::models::render_grid::RenderGrid;

use self::color::PaletteHandler;

/// Rasterises a grid: real axis left to right, imaginary axis bottom to top.
pub fn to_image(grid: &RenderGrid, palette: &PaletteHandler) -> RgbImage {
    let width = grid.width() as u32;
    let height = grid.height() as u32;

    let mut image = RgbImage::new(width, height);
    for (x, column) in grid.columns().iter().enumerate() {
        for (y, &code) in column.iter().enumerate() {
            let (r, g, b) = palette.escape_color(code);
            // row 0 of the grid is min_im, which belongs at the bottom of the image
            image.put_pixel(x as u32, height - 1 - y as u32, Rgb([r, g, b]));
        }
    }
    image
}

pub fn save_png(grid: &RenderGrid, palette: &PaletteHandler, path: &Path) -> ImageResult<()> {
    to_image(grid, palette).save_with_format(path, image::ImageFormat::Png)?;
    info!(
        "Saved {}x{} image to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}
