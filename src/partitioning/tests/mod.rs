use super::*;
use crate::mesh::serial::{CellData, NodeData, SerialMesh};

/// One cell per point with all four bounding nodes at that point.
pub(super) fn point_cloud_mesh(points: &[[f64; 3]]) -> SerialMesh {
    let mut mesh = SerialMesh::new();
    for p in points {
        let n = mesh.push_node(NodeData { coords: *p });
        mesh.push_cell(CellData::new([n; 4])).expect("node was just added");
    }
    mesh
}

#[test]
fn grid_rejects_zero_counts() {
    assert_eq!(
        ColumnGrid::new(0, 3),
        Err(PartitionError::InvalidPartitionCount { axis: Axis::X, value: 0 })
    );
    assert_eq!(
        ColumnGrid::new(3, 0),
        Err(PartitionError::InvalidPartitionCount { axis: Axis::Y, value: 0 })
    );
}

#[test]
fn grid_rejects_overflow() {
    assert!(matches!(
        ColumnGrid::new(usize::MAX, 2),
        Err(PartitionError::PartitionCountOverflow { .. })
    ));
}

#[test]
fn grid_ids_round_trip() {
    let grid = ColumnGrid::new(3, 4).unwrap();
    assert_eq!(grid.num_parts(), 12);
    for i in 0..3 {
        for j in 0..4 {
            let p = grid.part_id(i, j);
            assert_eq!(p, (i * 4 + j) as PartitionId);
            assert_eq!(grid.column_row(p), (i, j));
        }
    }
}

#[test]
fn config_default_is_single_partition() {
    let cfg = PartitionerConfig::default();
    let p = ColumnPartitioner::new(&cfg).unwrap();
    assert_eq!(p.grid().num_parts(), 1);
    assert_eq!(cfg.report_limit, 100);
}

#[test]
fn config_with_zero_axis_fails() {
    let cfg = PartitionerConfig {
        num_parts_y: 0,
        ..Default::default()
    };
    assert!(ColumnPartitioner::new(&cfg).is_err());
}

#[test]
fn assignment_rejects_out_of_range_ids() {
    let err = PartitionAssignment::try_new(vec![0, 3, 1], 3).unwrap_err();
    assert!(matches!(
        err,
        crate::mesh_error::MeshColumnsError::PartitionIdOutOfRange {
            cell: 1,
            part: 3,
            num_parts: 3,
        }
    ));
}

#[test]
fn more_columns_than_cells() {
    let mesh = point_cloud_mesh(&[[2.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    let out = ColumnPartitioner::from_grid(ColumnGrid::new(4, 2).unwrap())
        .partition(&mesh)
        .unwrap();
    assert_eq!(out.assignment.as_slice(), &[2, 0]);
    assert_eq!(part_sizes(&out.assignment), vec![1, 0, 1, 0, 0, 0, 0, 0]);
    assert_eq!(out.layout.columns[2], None);
}
