//! Mesh representations: the serial input mesh, its partitioned form, and a
//! structured generator.

pub mod generation;
pub mod partitioned;
pub mod serial;

pub use generation::box_tet_mesh;
pub use partitioned::{
    GridShape, LocalCell, LocalNode, MeshPiece, NeighborLinks, PartitionedMesh,
};
pub use serial::{BoundingBox, CellData, NODES_PER_CELL, NodeData, SerialMesh};
