use clap::Parser;

#[derive(Parser, Debug)]
pub struct WorkerCommand {
    /// Name reported by the health endpoint and in logs. Defaults to `worker-<uuid>`.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Interface to listen on. Defaults to `localhost`.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Port to listen on. Defaults to 8787.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of HTTP worker threads. Defaults to one per core.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Largest `col_count × row_count` accepted in one request.
    #[arg(long)]
    pub max_points: Option<u64>,
}
