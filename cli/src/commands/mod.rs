use clap::Subcommand;

use self::{render::RenderCommand, worker::WorkerCommand};

pub mod render;
pub mod worker;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 🖼️ Render
    ///
    /// Split a region of the complex plane across compute nodes and save the stitched image.
    Render(RenderCommand),

    /// 👷 Worker Mode
    ///
    /// Run a compute node that answers Mandelbrot fragment requests over HTTP.
    Worker(WorkerCommand),
}
