/// Largest `col_count × row_count` a node accepts in one request.
pub const DEFAULT_MAX_POINTS: u64 = 1 << 24;

/// Identity and listening configuration of a compute node.
#[derive(Debug, Clone)]
pub struct Worker {
    pub name: String,
    pub address: String,
    pub port: u16,
    /// HTTP worker threads; `None` lets actix pick one per core.
    pub workers: Option<usize>,
    pub max_points: u64,
}

impl Worker {
    pub fn new(name: String, address: String, port: u16) -> Self {
        Self {
            name,
            address,
            port,
            workers: None,
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
