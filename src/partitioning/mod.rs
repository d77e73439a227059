//! Entry-point for column partitioning.
//!
//! Cells are assigned to an `num_parts_x × num_parts_y` grid of partitions by
//! sorting cell centroids along X, chunking into columns, then sorting each
//! column along Y and chunking into rows. See [`columns`] for the driver,
//! [`chunks`] for the balancing rule and [`centroid`] for the sort keys.

pub mod centroid;
pub mod chunks;
pub mod columns;
pub mod error;
pub mod metrics;

#[cfg(test)]
mod tests;

pub use self::columns::{
    ColumnPartition, ColumnPartitioner, Extent, PartInfo, PartitionLayout, partition_columns,
};
pub use self::error::{Axis, PartitionError};
pub use self::metrics::*;

use crate::mesh_error::MeshColumnsError;

pub type PartitionId = u64;

/// Shape of the partition grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGrid {
    num_parts_x: usize,
    num_parts_y: usize,
}

impl ColumnGrid {
    /// Validate both axis counts and their product.
    ///
    /// # Errors
    /// * [`PartitionError::InvalidPartitionCount`] if either count is zero.
    /// * [`PartitionError::PartitionCountOverflow`] if the product does not fit.
    pub fn new(num_parts_x: usize, num_parts_y: usize) -> Result<Self, PartitionError> {
        if num_parts_x == 0 {
            return Err(PartitionError::InvalidPartitionCount {
                axis: Axis::X,
                value: num_parts_x,
            });
        }
        if num_parts_y == 0 {
            return Err(PartitionError::InvalidPartitionCount {
                axis: Axis::Y,
                value: num_parts_y,
            });
        }
        let overflow = PartitionError::PartitionCountOverflow {
            x: num_parts_x,
            y: num_parts_y,
        };
        let total = num_parts_x.checked_mul(num_parts_y).ok_or(overflow.clone())?;
        PartitionId::try_from(total).map_err(|_| overflow)?;
        Ok(Self {
            num_parts_x,
            num_parts_y,
        })
    }

    #[inline]
    pub fn num_parts_x(&self) -> usize {
        self.num_parts_x
    }

    #[inline]
    pub fn num_parts_y(&self) -> usize {
        self.num_parts_y
    }

    /// Total number of partitions.
    #[inline]
    pub fn num_parts(&self) -> usize {
        self.num_parts_x * self.num_parts_y
    }

    /// Partition id of `(column, row)`.
    #[inline]
    pub fn part_id(&self, column: usize, row: usize) -> PartitionId {
        debug_assert!(column < self.num_parts_x && row < self.num_parts_y);
        (column * self.num_parts_y + row) as PartitionId
    }

    /// Inverse of [`part_id`](Self::part_id).
    #[inline]
    pub fn column_row(&self, part: PartitionId) -> (usize, usize) {
        let p = part as usize;
        (p / self.num_parts_y, p % self.num_parts_y)
    }
}

/// Knobs of a partitioning run.
#[derive(Debug, Clone)]
pub struct PartitionerConfig {
    pub num_parts_x: usize,
    pub num_parts_y: usize,
    /// Partition ids below this value get their cell counts logged.
    pub report_limit: usize,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            num_parts_x: 1,
            num_parts_y: 1,
            report_limit: 100,
        }
    }
}

impl PartitionerConfig {
    pub fn grid(&self) -> Result<ColumnGrid, PartitionError> {
        ColumnGrid::new(self.num_parts_x, self.num_parts_y)
    }
}

/// Partition id of every cell, indexed by cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionAssignment {
    parts: Vec<PartitionId>,
    num_parts: usize,
}

impl PartitionAssignment {
    /// Wrap a raw assignment, checking every id is below `num_parts`.
    pub fn try_new(parts: Vec<PartitionId>, num_parts: usize) -> Result<Self, MeshColumnsError> {
        if let Some((cell, &part)) = parts
            .iter()
            .enumerate()
            .find(|&(_, &p)| p >= num_parts as PartitionId)
        {
            return Err(MeshColumnsError::PartitionIdOutOfRange {
                cell,
                part,
                num_parts,
            });
        }
        Ok(Self { parts, num_parts })
    }

    pub(crate) fn from_raw(parts: Vec<PartitionId>, num_parts: usize) -> Self {
        Self { parts, num_parts }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of partitions this assignment was generated against.
    #[inline]
    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    /// Partition of `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is out of range.
    #[inline]
    pub fn part_of(&self, cell: usize) -> PartitionId {
        self.parts[cell]
    }

    pub fn get(&self, cell: usize) -> Option<PartitionId> {
        self.parts.get(cell).copied()
    }

    pub fn as_slice(&self) -> &[PartitionId] {
        &self.parts
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, PartitionId)> + '_ {
        self.parts.iter().copied().enumerate()
    }

    pub fn into_vec(self) -> Vec<PartitionId> {
        self.parts
    }
}
