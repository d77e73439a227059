//! Serial (single-domain) tetrahedral mesh.
//!
//! Cells reference exactly four bounding nodes by dense zero-based index and
//! nodes carry a 3-D coordinate. This is the input of the column partitioner
//! and of [`PartitionedMesh::from_serial`](crate::mesh::partitioned::PartitionedMesh::from_serial).

use crate::partitioning::error::PartitionError;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use static_assertions::{assert_impl_all, const_assert_eq};

/// Number of bounding nodes of every cell.
pub const NODES_PER_CELL: usize = 4;

/// A mesh node: its coordinate in 3-D space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeData {
    pub coords: [f64; 3],
}

/// A tetrahedral cell: indices of its four bounding nodes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellData {
    pub bounding_nodes: [u64; NODES_PER_CELL],
}

const_assert_eq!(std::mem::size_of::<NodeData>(), 24);
const_assert_eq!(std::mem::size_of::<CellData>(), 32);

impl NodeData {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { coords: [x, y, z] }
    }
}

impl CellData {
    #[inline]
    pub fn new(bounding_nodes: [u64; NODES_PER_CELL]) -> Self {
        Self { bounding_nodes }
    }
}

/// Axis-aligned bounding box of a node set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// In-memory serial mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SerialMesh {
    nodes: Vec<NodeData>,
    cells: Vec<CellData>,
}

assert_impl_all!(SerialMesh: Send, Sync);

impl SerialMesh {
    /// Empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from node and cell arrays, checking that every bounding
    /// node index is valid.
    pub fn from_parts(nodes: Vec<NodeData>, cells: Vec<CellData>) -> Result<Self, PartitionError> {
        let mesh = Self { nodes, cells };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Append a node and return its index.
    pub fn push_node(&mut self, node: NodeData) -> u64 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u64
    }

    /// Append a cell and return its index.
    ///
    /// # Errors
    /// [`PartitionError::DanglingNode`] if any bounding node has not been added yet.
    pub fn push_cell(&mut self, cell: CellData) -> Result<usize, PartitionError> {
        let cell_idx = self.cells.len();
        self.check_cell(cell_idx, &cell)?;
        self.cells.push(cell);
        Ok(cell_idx)
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    #[inline]
    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    /// Node by global index, `None` if out of range.
    #[inline]
    pub fn node(&self, idx: u64) -> Option<&NodeData> {
        usize::try_from(idx).ok().and_then(|i| self.nodes.get(i))
    }

    /// Check that every cell references valid nodes.
    pub fn validate(&self) -> Result<(), PartitionError> {
        self.cells
            .iter()
            .enumerate()
            .try_for_each(|(idx, cell)| self.check_cell(idx, cell))
    }

    fn check_cell(&self, cell_idx: usize, cell: &CellData) -> Result<(), PartitionError> {
        match cell
            .bounding_nodes
            .iter()
            .find(|&&n| self.node(n).is_none())
        {
            Some(&node) => Err(PartitionError::DanglingNode {
                cell: cell_idx,
                node,
                num_nodes: self.nodes.len(),
            }),
            None => Ok(()),
        }
    }

    /// Bounding box of all nodes, `None` for a mesh without nodes.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.nodes.first()?;
        let init = BoundingBox {
            min: first.coords,
            max: first.coords,
        };
        Some(self.nodes.iter().fold(init, |mut bb, n| {
            for d in 0..3 {
                bb.min[d] = bb.min[d].min(n.coords[d]);
                bb.max[d] = bb.max[d].max(n.coords[d]);
            }
            bb
        }))
    }
}
