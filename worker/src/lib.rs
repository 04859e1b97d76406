pub mod error;
pub mod handlers;
pub mod params;

use std::net::SocketAddr;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use log::{error, info};
use shared::{
    dtos::{fragment_query::FragmentQuery, fragment_response::FragmentResponse},
    models::{fractal::mandelbrot::Mandelbrot, range::AxisRange},
    networking::{worker::Worker, HEALTH_PATH, MANDELBROT_PATH},
};

use self::error::ApiError;

/// Read-only per-node settings shared by every request handler.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub name: String,
    pub max_points: u64,
}

impl WorkerState {
    pub fn new(name: impl Into<String>, max_points: u64) -> Self {
        Self {
            name: name.into(),
            max_points,
        }
    }
}

impl From<&Worker> for WorkerState {
    fn from(worker: &Worker) -> Self {
        Self::new(worker.name.clone(), worker.max_points)
    }
}

/// Registers the node's routes. The app must also carry a `web::Data<WorkerState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .route(HEALTH_PATH, web::get().to(handlers::health))
    .route(MANDELBROT_PATH, web::get().to(handlers::mandelbrot))
    .route(
        "/mandelbrot/{min_re}/{min_im}/{max_re}/{max_im}/{col_count}/{row_count}/{max_iter}",
        web::get().to(handlers::mandelbrot_path),
    );
}

/// Samples both axes of `query` and runs the kernel over them.
pub fn perform_fragment(query: &FragmentQuery) -> FragmentResponse {
    let c_real = AxisRange::new(query.min_re, query.max_re);
    let c_imag = AxisRange::new(query.min_im, query.max_im);

    let re_samples = c_real.samples(query.col_count as usize);
    let im_samples = c_imag.samples(query.row_count as usize);
    let data = Mandelbrot::new(query.max_iter).compute(&re_samples, &im_samples);

    FragmentResponse {
        c_real,
        c_imag,
        data,
    }
}

/// Binds the node's HTTP server without starting it, returning the bound addresses
/// (useful when `port` is 0).
pub fn serve(worker: &Worker) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let state = web::Data::new(WorkerState::from(worker));

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    });
    if let Some(workers) = worker.workers {
        server = server.workers(workers);
    }

    let server = server.bind(worker.bind_address())?;
    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

pub async fn run_worker(worker: Worker) -> std::io::Result<()> {
    let (server, addrs) = match serve(&worker) {
        Ok(bound) => bound,
        Err(e) => {
            error!("Failed to bind {}: {}", worker.bind_address(), e);
            return Err(e);
        }
    };
    info!("Worker {} listening on {:?}", worker.name, addrs);

    match server.await {
        Ok(()) => {
            info!("Worker {} shutdown gracefully", worker.name);
            Ok(())
        }
        Err(e) => {
            error!("Worker error: {}", e);
            Err(e)
        }
    }
}
