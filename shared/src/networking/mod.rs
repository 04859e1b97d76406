pub mod worker;

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Route of the compute endpoint on every node.
pub const MANDELBROT_PATH: &str = "/mandelbrot";

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("node address is empty")]
    Empty,

    #[error("node address `{0}` contains whitespace")]
    Whitespace(String),
}

/// Where a compute node listens, either `host:port` or a full `http(s)://` base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress(String);

impl NodeAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base_url(&self) -> String {
        let address = self.0.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl FromStr for NodeAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AddressError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_port_gets_http_scheme() {
        let address: NodeAddress = "localhost:5000".parse().unwrap();
        assert_eq!(address.endpoint(MANDELBROT_PATH), "http://localhost:5000/mandelbrot");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let address: NodeAddress = "https://node-1.internal:8443/".parse().unwrap();
        assert_eq!(address.endpoint(HEALTH_PATH), "https://node-1.internal:8443/health");
    }

    #[test]
    fn rejects_blank_and_spaced_addresses() {
        assert_eq!("  ".parse::<NodeAddress>(), Err(AddressError::Empty));
        assert!(matches!(
            "host :80".parse::<NodeAddress>(),
            Err(AddressError::Whitespace(_))
        ));
    }
}
