use log::debug;

/// Loads variables from a `.env` file in the working directory or its parents, if any.
pub fn init() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found, using process environment"),
    }
}
