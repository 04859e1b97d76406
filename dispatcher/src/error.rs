use std::time::Duration;

use shared::{models::range::AxisRange, networking::NodeAddress};
use thiserror::Error;

/// Why a single partition could not be computed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("node answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("no response within {after:?}")]
    Timeout { after: Duration },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("response shape mismatch: {0}")]
    Shape(String),

    #[error("escape code {0} is outside [0, 256]")]
    InvalidCode(u16),

    #[error("{axis} range echoed as {echoed:?}, sent {sent:?}")]
    EchoMismatch {
        axis: &'static str,
        sent: AxisRange,
        echoed: AxisRange,
    },

    #[error("dispatch task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DispatchError::Decode(e.to_string())
        } else {
            DispatchError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
#[error("partition {index} on {node}: {cause}")]
pub struct PartitionFailure {
    pub index: usize,
    pub node: NodeAddress,
    pub cause: DispatchError,
}

/// The Partitioner and the nodes disagreed on the grid shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StitchError {
    #[error("{units} work units but {results} results")]
    CountMismatch { units: usize, results: usize },

    #[error("work unit at position {position} has index {index}")]
    OutOfOrder { position: usize, index: usize },

    #[error("no result for partition {index}")]
    MissingResult { index: usize },

    #[error("partition {index} returned {found} columns, expected {expected}")]
    ColumnMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("partition {index} column {column} has {found} rows, expected {expected}")]
    RowMismatch {
        index: usize,
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("partitions cover {found} columns, viewport has {expected}")]
    WidthMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compute nodes supplied")]
    NoNodes,

    #[error("viewport has no columns to render")]
    EmptyViewport,

    #[error("{} of {} partitions failed: {}", .failures.len(), .total, join_failures(.failures))]
    Partial {
        total: usize,
        failures: Vec<PartitionFailure>,
    },

    #[error("stitching failed: {0}")]
    Stitch(#[from] StitchError),

    #[error("could not build transport: {0}")]
    Transport(String),
}

fn join_failures(failures: &[PartitionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not valid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_names_partition_node_and_cause() {
        let err = RenderError::Partial {
            total: 3,
            failures: vec![PartitionFailure {
                index: 1,
                node: "node-b:5000".parse().unwrap(),
                cause: DispatchError::Status {
                    status: 500,
                    body: "boom".to_string(),
                },
            }],
        };
        assert_eq!(
            err.to_string(),
            "1 of 3 partitions failed: partition 1 on node-b:5000: node answered HTTP 500: boom"
        );
    }

    #[test]
    fn timeout_reports_duration() {
        let err = DispatchError::Timeout {
            after: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "no response within 250ms");
    }
}
