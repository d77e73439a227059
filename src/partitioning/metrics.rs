//! Partitioning metrics utilities.
//!
//! Load balance and node replication of a [`PartitionAssignment`]. These are
//! reported by the command-line tools and checked by the tests; the
//! partitioner itself never consults them.

use super::PartitionAssignment;
use crate::mesh::serial::SerialMesh;
use num_traits::ToPrimitive;

/// Number of cells in each partition, indexed by partition id.
pub fn part_sizes(assignment: &PartitionAssignment) -> Vec<usize> {
    let mut sizes = vec![0usize; assignment.num_parts()];
    for (_, part) in assignment.iter() {
        if let Some(slot) = sizes.get_mut(part as usize) {
            *slot += 1;
        }
    }
    sizes
}

/// Largest relative deviation of a part size above the ideal `total / parts`.
///
/// Returns `0.0` for an empty assignment or zero parts.
pub fn imbalance_from_sizes(sizes: &[usize]) -> f64 {
    let total: usize = sizes.iter().sum();
    let ideal = total.to_f64().unwrap_or(0.0) / sizes.len().to_f64().unwrap_or(1.0);
    if sizes.is_empty() || ideal == 0.0 {
        return 0.0;
    }
    sizes
        .iter()
        .map(|&s| (s.to_f64().unwrap_or(0.0) - ideal) / ideal)
        .fold(0.0f64, f64::max)
}

/// Imbalance of an assignment, see [`imbalance_from_sizes`].
pub fn imbalance(assignment: &PartitionAssignment) -> f64 {
    imbalance_from_sizes(&part_sizes(assignment))
}

/// Average number of partitions that reference each node (O(cells)).
///
/// A node referenced only by cells of one partition counts once; a node on a
/// partition interface counts once per partition touching it. Nodes not
/// referenced by any cell are skipped.
pub fn node_replication_factor(mesh: &SerialMesh, assignment: &PartitionAssignment) -> f64 {
    let mut owners: Vec<Vec<u64>> = vec![Vec::new(); mesh.num_nodes()];
    for (cell, data) in mesh.cells().iter().enumerate() {
        let Some(part) = assignment.get(cell) else {
            continue;
        };
        for &node in &data.bounding_nodes {
            if let Some(o) = owners.get_mut(node as usize) {
                if !o.contains(&part) {
                    o.push(part);
                }
            }
        }
    }
    let (touched, total) = owners
        .iter()
        .filter(|o| !o.is_empty())
        .fold((0usize, 0usize), |(n, t), o| (n + 1, t + o.len()));
    if touched == 0 {
        return 0.0;
    }
    total as f64 / touched as f64
}
