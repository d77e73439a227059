#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-columns
//!
//! mesh-columns splits an unstructured tetrahedral mesh into a grid of
//! vertical columns so that each partition holds a near-equal share of cells.
//! Cells are ordered by the X coordinate of their centroid and cut into
//! `X` columns, then every column is ordered by Y and cut into `Y` parts.
//!
//! ## Features
//! - Serial mesh model with validated node/cell tables
//! - Balanced chunk splitting and centroid extraction
//! - Column partitioning with per-part layout and balance metrics
//! - Partitioned mesh pieces with interface-node links between neighbors
//! - JSON and Gmsh (ASCII v2.2) input, JSON partitioned bundles
//! - Pluggable communication backends (serial, Rayon, MPI) for distributing a
//!   partitioned mesh across ranks
//!
//! ## Determinism
//!
//! Sorting is stable and uses a total order on coordinates, so equal inputs
//! give equal partitions on every run and every platform.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mesh-columns = "0.1"
//! # Optional features:
//! # features = ["mpi-support"]
//! ```
//!
//! ```
//! use mesh_columns::prelude::*;
//!
//! let mesh = box_tet_mesh(4, 2, 1, [0.0; 3], [4.0, 2.0, 1.0]).unwrap();
//! let cfg = PartitionerConfig { num_parts_x: 2, num_parts_y: 2, ..Default::default() };
//! let result = ColumnPartitioner::new(&cfg).unwrap().partition(&mesh).unwrap();
//! assert_eq!(result.assignment.num_parts(), 4);
//! assert_eq!(part_sizes(&result.assignment), vec![12, 12, 12, 12]);
//! ```

pub mod algs;
pub mod io;
pub mod mesh;
pub mod mesh_error;
pub mod partitioning;
pub mod report;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::communicator::{Communicator, NoComm, RayonComm, Wait};
    pub use crate::io::partitioned::{
        PartitionData, read_in_parallel, read_partitioned_mesh, write_partitioned_mesh,
    };
    pub use crate::io::serial::{read_serial_mesh, write_serial_mesh};
    pub use crate::io::{MeshReader, MeshWriter, read_mesh_auto};
    pub use crate::mesh::{
        CellData, MeshPiece, NodeData, PartitionedMesh, SerialMesh, box_tet_mesh,
    };
    pub use crate::mesh_error::MeshColumnsError;
    pub use crate::partitioning::{
        ColumnGrid, ColumnPartition, ColumnPartitioner, PartitionAssignment, PartitionError,
        PartitionId, PartitionerConfig, imbalance, part_sizes, partition_columns,
    };
    pub use crate::report::Reporter;
}
