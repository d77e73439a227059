//! Conversion of a serial mesh plus partition assignment into per-partition
//! mesh pieces.
//!
//! Each [`MeshPiece`] owns the cells assigned to its partition, a local copy
//! of every node those cells touch, and the list of nodes it shares with each
//! neighboring partition. Pieces are built independently with Rayon.

use crate::mesh::serial::{CellData, NODES_PER_CELL, NodeData, SerialMesh};
use crate::mesh_error::MeshColumnsError;
use crate::partitioning::{ColumnGrid, PartitionAssignment, PartitionId};
use hashbrown::HashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cell owned by a piece: its global id and piece-local bounding nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCell {
    pub global: u64,
    pub bounding_nodes: [u64; NODES_PER_CELL],
}

/// A node copied into a piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalNode {
    pub global: u64,
    pub coords: [f64; 3],
}

/// Nodes shared with one neighboring partition, by global id (ascending).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborLinks {
    pub part: PartitionId,
    pub shared_nodes: Vec<u64>,
}

/// Local mesh of one partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPiece {
    pub part: PartitionId,
    /// Owned cells in ascending global order.
    pub cells: Vec<LocalCell>,
    /// Touched nodes in ascending global order.
    pub nodes: Vec<LocalNode>,
    /// Neighbor partitions in ascending order.
    pub neighbors: Vec<NeighborLinks>,
}

impl MeshPiece {
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes shared with at least one other partition.
    pub fn num_interface_nodes(&self) -> usize {
        let mut shared: Vec<u64> = self
            .neighbors
            .iter()
            .flat_map(|n| n.shared_nodes.iter().copied())
            .collect();
        shared.sort_unstable();
        shared.dedup();
        shared.len()
    }
}

/// Grid the assignment was generated on, when known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub num_parts_x: usize,
    pub num_parts_y: usize,
}

impl From<ColumnGrid> for GridShape {
    fn from(g: ColumnGrid) -> Self {
        Self {
            num_parts_x: g.num_parts_x(),
            num_parts_y: g.num_parts_y(),
        }
    }
}

/// A mesh split into one piece per partition id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionedMesh {
    pub num_parts: usize,
    pub grid: Option<GridShape>,
    pub num_global_cells: u64,
    pub num_global_nodes: u64,
    /// Indexed by partition id.
    pub pieces: Vec<MeshPiece>,
    /// Nodes no cell references; kept so the serial mesh can be rebuilt.
    #[serde(default)]
    pub unattached_nodes: Vec<LocalNode>,
}

impl PartitionedMesh {
    /// Split `mesh` according to `assignment` into `num_parts` pieces.
    ///
    /// # Errors
    /// * [`MeshColumnsError::AssignmentLengthMismatch`] if the assignment does
    ///   not have one entry per cell.
    /// * [`MeshColumnsError::PartitionIdOutOfRange`] if an entry is not below
    ///   `num_parts`.
    /// * [`MeshColumnsError::Partition`] if the mesh references missing nodes.
    pub fn from_serial(
        mesh: &SerialMesh,
        assignment: &PartitionAssignment,
        num_parts: usize,
    ) -> Result<Self, MeshColumnsError> {
        if assignment.len() != mesh.num_cells() {
            return Err(MeshColumnsError::AssignmentLengthMismatch {
                expected: mesh.num_cells(),
                found: assignment.len(),
            });
        }
        if let Some((cell, part)) = assignment
            .iter()
            .find(|&(_, p)| p >= num_parts as PartitionId)
        {
            return Err(MeshColumnsError::PartitionIdOutOfRange {
                cell,
                part,
                num_parts,
            });
        }
        mesh.validate()?;

        let mut cells_by_part: Vec<Vec<usize>> = vec![Vec::new(); num_parts];
        let mut node_parts: Vec<Vec<PartitionId>> = vec![Vec::new(); mesh.num_nodes()];
        for (cell, part) in assignment.iter() {
            cells_by_part[part as usize].push(cell);
            for &node in &mesh.cells()[cell].bounding_nodes {
                let parts = &mut node_parts[node as usize];
                if !parts.contains(&part) {
                    parts.push(part);
                }
            }
        }

        let pieces: Vec<MeshPiece> = cells_by_part
            .par_iter()
            .enumerate()
            .map(|(part, cells)| build_piece(mesh, part as PartitionId, cells, &node_parts))
            .collect();

        let unattached_nodes = node_parts
            .iter()
            .enumerate()
            .filter(|(_, parts)| parts.is_empty())
            .map(|(n, _)| LocalNode {
                global: n as u64,
                coords: mesh.nodes()[n].coords,
            })
            .collect();

        Ok(Self {
            num_parts,
            grid: None,
            num_global_cells: mesh.num_cells() as u64,
            num_global_nodes: mesh.num_nodes() as u64,
            pieces,
            unattached_nodes,
        })
    }

    /// Record the grid the assignment came from.
    pub fn with_grid(mut self, grid: ColumnGrid) -> Self {
        self.grid = Some(grid.into());
        self
    }

    pub fn piece(&self, part: PartitionId) -> Option<&MeshPiece> {
        self.pieces.get(part as usize)
    }

    /// Rebuild the serial mesh and the assignment this mesh was split with.
    ///
    /// # Errors
    /// [`MeshColumnsError::MeshIoParse`] if the pieces do not describe every
    /// global cell and node exactly once, or reference nodes inconsistently.
    pub fn assemble(&self) -> Result<(SerialMesh, PartitionAssignment), MeshColumnsError> {
        let bad = |msg: String| MeshColumnsError::MeshIoParse(msg);
        let num_cells = to_index(self.num_global_cells)?;
        let num_nodes = to_index(self.num_global_nodes)?;

        let mut nodes: Vec<Option<NodeData>> = vec![None; num_nodes];
        let mut place_node = |n: &LocalNode| -> Result<(), MeshColumnsError> {
            let slot = nodes
                .get_mut(to_index(n.global)?)
                .ok_or_else(|| bad(format!("node {} out of range", n.global)))?;
            if slot.is_some_and(|existing| existing.coords != n.coords) {
                return Err(bad(format!("node {} has conflicting coordinates", n.global)));
            }
            *slot = Some(NodeData { coords: n.coords });
            Ok(())
        };
        for piece in &self.pieces {
            piece.nodes.iter().try_for_each(&mut place_node)?;
        }
        self.unattached_nodes.iter().try_for_each(&mut place_node)?;

        let mut cells: Vec<Option<(CellData, PartitionId)>> = vec![None; num_cells];
        for piece in &self.pieces {
            for cell in &piece.cells {
                let mut global = [0u64; NODES_PER_CELL];
                for (g, &local) in global.iter_mut().zip(&cell.bounding_nodes) {
                    *g = piece
                        .nodes
                        .get(to_index(local)?)
                        .map(|n| n.global)
                        .ok_or_else(|| {
                            bad(format!(
                                "piece {} cell {} has no local node {local}",
                                piece.part, cell.global
                            ))
                        })?;
                }
                let slot = cells
                    .get_mut(to_index(cell.global)?)
                    .ok_or_else(|| bad(format!("cell {} out of range", cell.global)))?;
                if slot.is_some() {
                    return Err(bad(format!("cell {} appears in more than one piece", cell.global)));
                }
                *slot = Some((CellData::new(global), piece.part));
            }
        }

        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| n.ok_or_else(|| bad(format!("node {i} missing from every piece"))))
            .collect::<Result<Vec<_>, _>>()?;
        let (cells, parts): (Vec<CellData>, Vec<PartitionId>) = cells
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.ok_or_else(|| bad(format!("cell {i} missing from every piece"))))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        let mesh = SerialMesh::from_parts(nodes, cells)?;
        let assignment = PartitionAssignment::try_new(parts, self.num_parts)?;
        Ok((mesh, assignment))
    }
}

fn to_index(v: u64) -> Result<usize, MeshColumnsError> {
    usize::try_from(v)
        .map_err(|_| MeshColumnsError::MeshIoParse(format!("index {v} does not fit usize")))
}

fn build_piece(
    mesh: &SerialMesh,
    part: PartitionId,
    cells: &[usize],
    node_parts: &[Vec<PartitionId>],
) -> MeshPiece {
    let mut globals: Vec<u64> = cells
        .iter()
        .flat_map(|&c| mesh.cells()[c].bounding_nodes)
        .collect();
    globals.sort_unstable();
    globals.dedup();

    let local_of: HashMap<u64, u64> = globals
        .iter()
        .enumerate()
        .map(|(local, &global)| (global, local as u64))
        .collect();

    let local_cells = cells
        .iter()
        .map(|&c| LocalCell {
            global: c as u64,
            bounding_nodes: mesh.cells()[c].bounding_nodes.map(|n| local_of[&n]),
        })
        .collect();

    let mut shared: BTreeMap<PartitionId, Vec<u64>> = BTreeMap::new();
    for &g in &globals {
        for &other in &node_parts[g as usize] {
            if other != part {
                shared.entry(other).or_default().push(g);
            }
        }
    }

    MeshPiece {
        part,
        cells: local_cells,
        nodes: globals
            .iter()
            .map(|&g| LocalNode {
                global: g,
                coords: mesh.nodes()[g as usize].coords,
            })
            .collect(),
        neighbors: shared
            .into_iter()
            .map(|(part, shared_nodes)| NeighborLinks { part, shared_nodes })
            .collect(),
    }
}
