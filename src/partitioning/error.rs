//! Partitioning errors for mesh-columns

use thiserror::Error;

/// Grid axis named in partition-count errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Precondition failures of the chunk splitter and column partitioner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// Asked to split a sequence into zero chunks.
    #[error("Cannot split into zero chunks")]
    ZeroChunks,
    /// A partition count along one axis was zero.
    #[error("Number of partitions along {axis} must be positive, got {value}")]
    InvalidPartitionCount { axis: Axis, value: usize },
    /// `num_parts_x * num_parts_y` does not fit a partition id.
    #[error("Partition grid {x} x {y} overflows the partition id range")]
    PartitionCountOverflow { x: usize, y: usize },
    /// A cell references a node outside the mesh's node set.
    #[error("Cell {cell} references node {node}, but the mesh has {num_nodes} nodes")]
    DanglingNode {
        cell: usize,
        node: u64,
        num_nodes: usize,
    },
}
