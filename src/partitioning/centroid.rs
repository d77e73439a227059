//! Per-cell representative points used for coordinate sorting.

use super::error::PartitionError;
use crate::mesh::serial::{NODES_PER_CELL, SerialMesh};
use std::cmp::Ordering;

/// Centroid of one cell: the mean of its bounding node coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    pub cell: usize,
    pub coord: [f64; 3],
}

impl Centroid {
    /// Total order on one coordinate axis (`0 = x`, `1 = y`, `2 = z`).
    #[inline]
    pub fn cmp_axis(&self, other: &Self, axis: usize) -> Ordering {
        self.coord[axis].total_cmp(&other.coord[axis])
    }
}

/// Centroids of every cell, in cell-index order.
///
/// # Errors
/// [`PartitionError::DanglingNode`] if a cell references a node that does
/// not exist.
pub fn compute_centroids(mesh: &SerialMesh) -> Result<Vec<Centroid>, PartitionError> {
    mesh.cells()
        .iter()
        .enumerate()
        .map(|(cell, data)| {
            let mut coord = [0.0f64; 3];
            for &node in &data.bounding_nodes {
                let n = mesh.node(node).ok_or(PartitionError::DanglingNode {
                    cell,
                    node,
                    num_nodes: mesh.num_nodes(),
                })?;
                for (c, x) in coord.iter_mut().zip(n.coords) {
                    *c += x;
                }
            }
            for c in &mut coord {
                *c /= NODES_PER_CELL as f64;
            }
            Ok(Centroid { cell, coord })
        })
        .collect()
}
