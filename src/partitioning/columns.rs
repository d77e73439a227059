//! Two-level coordinate partitioner: X columns, then Y rows within each column.

use super::centroid::{Centroid, compute_centroids};
use super::chunks::{chunk_ranges, split_into_chunks};
use super::error::PartitionError;
use super::{ColumnGrid, PartitionAssignment, PartitionId, PartitionerConfig};
use crate::mesh::serial::SerialMesh;
use log::{debug, info, warn};

const X_AXIS: usize = 0;
const Y_AXIS: usize = 1;

/// Closed interval of centroid coordinates along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    fn of(members: &[Centroid], axis: usize) -> Option<Self> {
        members.iter().fold(None, |acc, c| {
            let v = c.coord[axis];
            Some(match acc {
                None => Extent { min: v, max: v },
                Some(e) => Extent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                },
            })
        })
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Where one partition sits in the grid and what it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct PartInfo {
    pub column: usize,
    pub row: usize,
    pub num_cells: usize,
    /// X extent of member centroids, `None` when empty.
    pub x: Option<Extent>,
    /// Y extent of member centroids, `None` when empty.
    pub y: Option<Extent>,
}

/// Per-partition and per-column geometry of a partitioning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionLayout {
    pub grid: ColumnGrid,
    /// Indexed by partition id.
    pub parts: Vec<PartInfo>,
    /// X extent of each column, `None` when the column is empty.
    pub columns: Vec<Option<Extent>>,
}

impl PartitionLayout {
    pub fn part(&self, part: PartitionId) -> Option<&PartInfo> {
        self.parts.get(part as usize)
    }
}

/// Result of [`ColumnPartitioner::partition`].
#[derive(Debug, Clone)]
pub struct ColumnPartition {
    pub assignment: PartitionAssignment,
    pub layout: PartitionLayout,
}

/// Deterministic X-then-Y column partitioner.
#[derive(Debug, Clone)]
pub struct ColumnPartitioner {
    grid: ColumnGrid,
    report_limit: usize,
}

impl ColumnPartitioner {
    pub fn new(cfg: &PartitionerConfig) -> Result<Self, PartitionError> {
        Ok(Self {
            grid: cfg.grid()?,
            report_limit: cfg.report_limit,
        })
    }

    pub fn from_grid(grid: ColumnGrid) -> Self {
        Self {
            grid,
            report_limit: PartitionerConfig::default().report_limit,
        }
    }

    pub fn grid(&self) -> ColumnGrid {
        self.grid
    }

    /// Assign every cell of `mesh` to a partition of the grid.
    ///
    /// Each column receives `num_cells / num_parts_x` cells (the leading
    /// columns one more), and each row within a column receives
    /// `column_len / num_parts_y` (again the leading rows one more). Ties in
    /// a coordinate keep cell-index order.
    pub fn partition(&self, mesh: &SerialMesh) -> Result<ColumnPartition, PartitionError> {
        let grid = self.grid;
        let mut centroids = compute_centroids(mesh)?;
        debug!(
            "partitioning {} cells into {} x {} columns",
            centroids.len(),
            grid.num_parts_x(),
            grid.num_parts_y()
        );

        centroids.sort_by(|a, b| a.cmp_axis(b, X_AXIS));
        let column_bounds = split_into_chunks(centroids.len(), grid.num_parts_x())?;

        let mut row_bounds: Vec<Vec<usize>> = Vec::with_capacity(grid.num_parts_x());
        for range in chunk_ranges(&column_bounds) {
            let column = &mut centroids[range];
            column.sort_by(|a, b| a.cmp_axis(b, Y_AXIS));
            row_bounds.push(split_into_chunks(column.len(), grid.num_parts_y())?);
        }

        let mut parts = vec![0 as PartitionId; centroids.len()];
        let mut infos = Vec::with_capacity(grid.num_parts());
        let mut columns = Vec::with_capacity(grid.num_parts_x());
        for (i, (range, rows)) in chunk_ranges(&column_bounds).zip(&row_bounds).enumerate() {
            let column = &centroids[range];
            columns.push(Extent::of(column, X_AXIS));
            for (j, row) in chunk_ranges(rows).enumerate() {
                let part = grid.part_id(i, j);
                let members = &column[row];
                if (part as usize) < self.report_limit {
                    info!("Cells in partition ({i},{j}) = {}", members.len());
                }
                for c in members {
                    parts[c.cell] = part;
                }
                infos.push(PartInfo {
                    column: i,
                    row: j,
                    num_cells: members.len(),
                    x: Extent::of(members, X_AXIS),
                    y: Extent::of(members, Y_AXIS),
                });
            }
        }

        let empty = infos.iter().filter(|p| p.num_cells == 0).count();
        if empty > 0 {
            warn!("{empty} of {} partitions received no cells", grid.num_parts());
        }

        Ok(ColumnPartition {
            assignment: PartitionAssignment::from_raw(parts, grid.num_parts()),
            layout: PartitionLayout {
                grid,
                parts: infos,
                columns,
            },
        })
    }
}

/// Partition `mesh` onto `grid` and return only the assignment.
pub fn partition_columns(
    mesh: &SerialMesh,
    grid: ColumnGrid,
) -> Result<PartitionAssignment, PartitionError> {
    ColumnPartitioner::from_grid(grid)
        .partition(mesh)
        .map(|p| p.assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::serial::{CellData, NodeData};

    /// One degenerate cell per point, so each centroid equals its point.
    fn mesh_at(points: &[[f64; 3]]) -> SerialMesh {
        let mut mesh = SerialMesh::new();
        for p in points {
            let n = mesh.push_node(NodeData { coords: *p });
            mesh.push_cell(CellData::new([n; 4])).unwrap();
        }
        mesh
    }

    #[test]
    fn cube_corners_two_by_two() {
        let mut corners = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    corners.push([x, y, z]);
                }
            }
        }
        let mesh = mesh_at(&corners);
        let grid = ColumnGrid::new(2, 2).unwrap();
        let out = ColumnPartitioner::from_grid(grid).partition(&mesh).unwrap();

        let mut counts = [0usize; 4];
        for (cell, part) in out.assignment.iter() {
            counts[part as usize] += 1;
            let [x, y, _] = corners[cell];
            // column from x, row from y
            assert_eq!(part, grid.part_id(x as usize, y as usize));
        }
        assert_eq!(counts, [2, 2, 2, 2]);
        assert!(out.layout.parts.iter().all(|p| p.num_cells == 2));
    }

    #[test]
    fn ten_cells_three_columns() {
        let points: Vec<[f64; 3]> = (0..10).rev().map(|i| [i as f64, 0.0, 0.0]).collect();
        let mesh = mesh_at(&points);
        let out = ColumnPartitioner::from_grid(ColumnGrid::new(3, 1).unwrap())
            .partition(&mesh)
            .unwrap();
        let sizes: Vec<usize> = out.layout.parts.iter().map(|p| p.num_cells).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        // cell 0 sits at x = 9, so it lands in the last column
        assert_eq!(out.assignment.part_of(0), 2);
        assert_eq!(out.assignment.part_of(9), 0);
    }

    #[test]
    fn ties_keep_cell_order() {
        let mesh = mesh_at(&[[0.0; 3]; 5]);
        let a = partition_columns(&mesh, ColumnGrid::new(2, 1).unwrap()).unwrap();
        assert_eq!(a.as_slice(), &[0, 0, 0, 1, 1]);
    }

    #[test]
    fn empty_mesh_gives_empty_assignment() {
        let out = ColumnPartitioner::from_grid(ColumnGrid::new(3, 4).unwrap())
            .partition(&SerialMesh::new())
            .unwrap();
        assert!(out.assignment.is_empty());
        assert_eq!(out.assignment.num_parts(), 12);
        assert_eq!(out.layout.parts.len(), 12);
        assert!(out.layout.parts.iter().all(|p| p.num_cells == 0 && p.x.is_none()));
    }
}
