//! Human-readable summaries of serial and partitioned meshes.
//!
//! Printing is gated by an explicit [`Reporter`]; nothing here looks at a
//! global rank. Output is for people, not a stable machine format.

use crate::algs::communicator::Communicator;
use crate::io::partitioned::PartitionData;
use crate::mesh::partitioned::{MeshPiece, PartitionedMesh};
use crate::mesh::serial::{BoundingBox, SerialMesh};
use crate::partitioning::imbalance_from_sizes;
use std::fmt;
use std::io::{self, Write};

/// Whether the caller is the designated reporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reporter {
    Designated,
    Silent,
}

impl Reporter {
    /// Designated iff `comm.rank() == root`.
    pub fn for_rank<C: Communicator>(comm: &C, root: usize) -> Self {
        if comm.rank() == root {
            Reporter::Designated
        } else {
            Reporter::Silent
        }
    }

    #[inline]
    pub fn is_designated(self) -> bool {
        self == Reporter::Designated
    }
}

/// Run `f` on each rank in turn, rank 0 first, with a barrier after each turn.
///
/// Every rank must call this the same number of times.
pub fn for_each_rank_in_order<C, F>(comm: &C, mut f: F) -> io::Result<()>
where
    C: Communicator,
    F: FnMut() -> io::Result<()>,
{
    let mut result = Ok(());
    for turn in 0..comm.size() {
        if comm.rank() == turn {
            result = f();
        }
        comm.barrier();
    }
    result
}

/// Counts and extent of a serial mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSummary {
    pub num_cells: usize,
    pub num_nodes: usize,
    pub bounding_box: Option<BoundingBox>,
}

impl MeshSummary {
    pub fn of_serial(mesh: &SerialMesh) -> Self {
        Self {
            num_cells: mesh.num_cells(),
            num_nodes: mesh.num_nodes(),
            bounding_box: mesh.bounding_box(),
        }
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of cells: {}", self.num_cells)?;
        writeln!(f, "Number of nodes: {}", self.num_nodes)?;
        if let Some(bb) = &self.bounding_box {
            writeln!(
                f,
                "Bounding box: ({}, {}, {}) - ({}, {}, {})",
                bb.min[0], bb.min[1], bb.min[2], bb.max[0], bb.max[1], bb.max[2]
            )?;
        }
        Ok(())
    }
}

/// Per-piece counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceSummary {
    pub part: u64,
    pub num_cells: usize,
    pub num_nodes: usize,
    pub num_neighbors: usize,
    pub num_interface_nodes: usize,
}

impl PieceSummary {
    pub fn of(piece: &MeshPiece) -> Self {
        Self {
            part: piece.part,
            num_cells: piece.num_cells(),
            num_nodes: piece.num_nodes(),
            num_neighbors: piece.neighbors.len(),
            num_interface_nodes: piece.num_interface_nodes(),
        }
    }
}

impl fmt::Display for PieceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "partition {}: {} cells, {} nodes, {} neighbors, {} interface nodes",
            self.part, self.num_cells, self.num_nodes, self.num_neighbors, self.num_interface_nodes
        )
    }
}

/// Whole-mesh view of a partitioned mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionedSummary {
    pub num_parts: usize,
    pub grid: Option<(usize, usize)>,
    pub num_global_cells: u64,
    pub num_global_nodes: u64,
    pub pieces: Vec<PieceSummary>,
}

impl PartitionedSummary {
    pub fn of(mesh: &PartitionedMesh) -> Self {
        Self {
            num_parts: mesh.num_parts,
            grid: mesh.grid.map(|g| (g.num_parts_x, g.num_parts_y)),
            num_global_cells: mesh.num_global_cells,
            num_global_nodes: mesh.num_global_nodes,
            pieces: mesh.pieces.iter().map(PieceSummary::of).collect(),
        }
    }

    pub fn min_cells(&self) -> usize {
        self.pieces.iter().map(|p| p.num_cells).min().unwrap_or(0)
    }

    pub fn max_cells(&self) -> usize {
        self.pieces.iter().map(|p| p.num_cells).max().unwrap_or(0)
    }

    pub fn imbalance(&self) -> f64 {
        let sizes: Vec<usize> = self.pieces.iter().map(|p| p.num_cells).collect();
        imbalance_from_sizes(&sizes)
    }
}

impl fmt::Display for PartitionedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of partitions: {}", self.num_parts)?;
        if let Some((x, y)) = self.grid {
            writeln!(f, "Partition grid: {x} x {y}")?;
        }
        writeln!(f, "Number of global cells: {}", self.num_global_cells)?;
        writeln!(f, "Number of global nodes: {}", self.num_global_nodes)?;
        writeln!(
            f,
            "Cells per partition: min {}, max {}, imbalance {:.4}",
            self.min_cells(),
            self.max_cells(),
            self.imbalance()
        )
    }
}

fn write_piece<W: Write>(out: &mut W, piece: &MeshPiece, verbose: bool) -> io::Result<()> {
    writeln!(out, "  {}", PieceSummary::of(piece))?;
    if !verbose {
        return Ok(());
    }
    for n in &piece.neighbors {
        writeln!(out, "    neighbor {}: shared nodes {:?}", n.part, n.shared_nodes)?;
    }
    for (local, cell) in piece.cells.iter().enumerate() {
        writeln!(
            out,
            "    cell {local} (global {}): nodes {:?}",
            cell.global, cell.bounding_nodes
        )?;
    }
    for (local, node) in piece.nodes.iter().enumerate() {
        let [x, y, z] = node.coords;
        writeln!(out, "    node {local} (global {}): ({x}, {y}, {z})", node.global)?;
    }
    Ok(())
}

/// Print a whole partitioned mesh; a no-op unless `reporter` is designated.
pub fn print_partitioned_mesh<W: Write>(
    out: &mut W,
    reporter: Reporter,
    mesh: &PartitionedMesh,
    verbose: bool,
) -> io::Result<()> {
    if !reporter.is_designated() {
        return Ok(());
    }
    write!(out, "{}", PartitionedSummary::of(mesh))?;
    for piece in &mesh.pieces {
        write_piece(out, piece, verbose)?;
    }
    Ok(())
}

/// Print the pieces one rank holds; a no-op unless `reporter` is designated.
pub fn print_partition_data<W: Write>(
    out: &mut W,
    reporter: Reporter,
    data: &PartitionData,
    verbose: bool,
) -> io::Result<()> {
    if !reporter.is_designated() {
        return Ok(());
    }
    writeln!(
        out,
        "Rank {} of {}: {} partitions, {} local cells",
        data.rank,
        data.num_ranks,
        data.pieces.len(),
        data.num_local_cells()
    )?;
    for piece in &data.pieces {
        write_piece(out, piece, verbose)?;
    }
    Ok(())
}
