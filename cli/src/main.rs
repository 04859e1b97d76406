pub mod commands;

use std::{num::NonZeroUsize, process::ExitCode, time::Instant};

use clap::Parser;
use commands::{render::RenderCommand, worker::WorkerCommand, Commands};
use dispatcher::{
    config::{timeout_from_secs, DispatcherConfig},
    Dispatcher,
};
use log::{error, info};
use shared::{
    env,
    graphics::{color::PaletteHandler, save_png},
    logger,
    models::viewport::Viewport,
    networking::worker::{Worker, DEFAULT_MAX_POINTS},
};
use uuid::Uuid;

/// Distributed Mandelbrot renderer: run compute nodes, or render across them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    env::init();
    logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Worker(args) => run_worker(args).await,
        Commands::Render(args) => run_render(args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_worker(args: WorkerCommand) -> Result<(), String> {
    let name = match args.name {
        Some(name) => name,
        None => format!("worker-{}", Uuid::new_v4()),
    };
    let address = args.address.unwrap_or_else(|| "localhost".to_string());
    let port = args.port.unwrap_or(8787);

    let mut worker = Worker::new(name, address, port);
    worker.workers = args.workers;
    worker.max_points = args.max_points.unwrap_or(DEFAULT_MAX_POINTS);

    worker::run_worker(worker)
        .await
        .map_err(|e| format!("Worker stopped: {}", e))
}

async fn run_render(args: RenderCommand) -> Result<(), String> {
    info!("Starting...");
    let start_time = Instant::now();

    let viewport = Viewport::from_bounds(
        args.min_re,
        args.min_im,
        args.max_re,
        args.max_im,
        args.x,
        args.y,
        args.max_iter,
    )
    .map_err(|e| format!("Invalid viewport: {}", e))?;

    let env_config = DispatcherConfig::from_env().map_err(|e| e.to_string())?;
    let config = dispatcher_config(&args, env_config)?;
    let dispatcher = Dispatcher::http(config).map_err(|e| e.to_string())?;
    let grid = dispatcher
        .render(&viewport, &args.nodes)
        .await
        .map_err(|e| format!("Render failed: {}", e))?;

    info!("Rendering image...");
    let palette = PaletteHandler::new(args.palette.into());
    save_png(&grid, &palette, &args.output)
        .map_err(|e| format!("Failed to save {}: {}", args.output.display(), e))?;

    info!("--- {:.3} seconds ---", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Command-line flags on top of `config`, which carries the environment settings.
fn dispatcher_config(
    args: &RenderCommand,
    mut config: DispatcherConfig,
) -> Result<DispatcherConfig, String> {
    if let Some(divisions) = NonZeroUsize::new(args.divisions) {
        config.partitions = Some(divisions);
    }
    if let Some(seconds) = args.timeout {
        config.timeout = timeout_from_secs(seconds)
            .ok_or_else(|| format!("--timeout must be a positive number of seconds, got {}", seconds))?;
    }
    if let Some(retries) = args.retries {
        config.retry.max_retries = retries;
    }
    if let Some(millis) = args.backoff_ms {
        config.retry.backoff = std::time::Duration::from_millis(millis);
    }

    Ok(config)
}
