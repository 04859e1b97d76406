use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shared::{graphics::color::ColorPalette, networking::NodeAddress};

/// 🖼️ Render Command
///
/// Positional arguments follow the order `min_re min_im max_re max_im max_iter x y divisions nodes...`.
#[derive(Parser, Debug)]
#[command(name = "render", about = "🖼️ Render the Mandelbrot set on a set of compute nodes.", long_about = None)]
pub struct RenderCommand {
    /// Lower bound of the real axis
    #[arg(allow_negative_numbers = true)]
    pub min_re: f64,

    /// Lower bound of the imaginary axis
    #[arg(allow_negative_numbers = true)]
    pub min_im: f64,

    /// Upper bound of the real axis
    #[arg(allow_negative_numbers = true)]
    pub max_re: f64,

    /// Upper bound of the imaginary axis
    #[arg(allow_negative_numbers = true)]
    pub max_im: f64,

    /// Iteration bound per point
    pub max_iter: u32,

    /// Samples along the real axis (image width)
    pub x: u32,

    /// Samples along the imaginary axis (image height)
    pub y: u32,

    /// Number of partitions the real axis is split into; 0 defers to MANDEL_PARTITIONS,
    /// then to one partition per node
    pub divisions: usize,

    /// Compute node addresses, `host:port` or `http://host:port`
    #[arg(required = true, num_args = 1..)]
    pub nodes: Vec<NodeAddress>,

    /// ⏱️ Per-request timeout in seconds (default 30, or MANDEL_NODE_TIMEOUT_SECS)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// 🔁 Retries per failed partition (default 0, or MANDEL_MAX_RETRIES)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Initial pause between retries in milliseconds (or MANDEL_RETRY_BACKOFF_MS)
    #[arg(long, value_name = "MILLIS")]
    pub backoff_ms: Option<u64>,

    /// 💾 Where to write the PNG
    #[arg(short, long, default_value = "mandelbrot.png")]
    pub output: PathBuf,

    /// 🎨 Colour palette
    #[arg(long, value_enum, default_value_t = PaletteArg::Classic)]
    pub palette: PaletteArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteArg {
    Classic,
    Inverted,
    Grayscale,
}

impl From<PaletteArg> for ColorPalette {
    fn from(arg: PaletteArg) -> Self {
        match arg {
            PaletteArg::Classic => ColorPalette::Classic,
            PaletteArg::Inverted => ColorPalette::Inverted,
            PaletteArg::Grayscale => ColorPalette::Grayscale,
        }
    }
}
