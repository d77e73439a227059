//! MeshColumnsError: Unified error type for mesh-columns public APIs
//!
//! Partitioning preconditions surface as [`PartitionError`] and are wrapped
//! here together with I/O, parsing, and conversion failures so that the
//! command-line tools can propagate everything with `?`.

use crate::partitioning::error::PartitionError;
use thiserror::Error;

/// Unified error type for mesh-columns operations.
#[derive(Debug, Error)]
pub enum MeshColumnsError {
    /// A partitioning precondition was violated.
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// Underlying filesystem or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A mesh file could not be parsed or had an unsupported layout.
    #[error("Mesh I/O parse error: {0}")]
    MeshIoParse(String),
    /// The partition assignment does not cover every cell exactly once.
    #[error("Partition assignment has {found} entries but the mesh has {expected} cells")]
    AssignmentLengthMismatch { expected: usize, found: usize },
    /// A cell was assigned to a partition id outside `[0, num_parts)`.
    #[error("Cell {cell} assigned to partition {part}, but only {num_parts} partitions exist")]
    PartitionIdOutOfRange {
        cell: usize,
        part: u64,
        num_parts: usize,
    },
    /// Mesh generation parameters describe no valid geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Rank coordination failed (missing or truncated message).
    #[error("Communication failure: {0}")]
    CommFailure(String),
}

impl From<serde_json::Error> for MeshColumnsError {
    fn from(e: serde_json::Error) -> Self {
        MeshColumnsError::MeshIoParse(e.to_string())
    }
}
