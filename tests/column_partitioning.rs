mod util;

use mesh_columns::mesh::box_tet_mesh;
use mesh_columns::partitioning::{
    ColumnGrid, ColumnPartitioner, PartitionError, PartitionerConfig, imbalance, part_sizes,
    partition_columns,
};
use util::{cube_corners, point_mesh};

#[test]
fn cube_corners_split_two_by_two() {
    let mesh = point_mesh(&cube_corners());
    let grid = ColumnGrid::new(2, 2).unwrap();
    let a = partition_columns(&mesh, grid).unwrap();
    assert_eq!(part_sizes(&a), vec![2, 2, 2, 2]);
    for (cell, part) in a.iter() {
        let [x, y, _] = mesh.nodes()[cell].coords;
        let want = grid.part_id(x as usize, y as usize);
        assert_eq!(part, want, "cell {cell} at ({x}, {y})");
    }
}

#[test]
fn ten_cells_three_columns() {
    let pts: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
    let a = partition_columns(&point_mesh(&pts), ColumnGrid::new(3, 1).unwrap()).unwrap();
    assert_eq!(a.as_slice(), &[0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
}

#[test]
fn more_parts_than_cells_leaves_trailing_parts_empty() {
    let pts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
    let a = partition_columns(&point_mesh(&pts), ColumnGrid::new(4, 1).unwrap()).unwrap();
    assert_eq!(part_sizes(&a), vec![1, 1, 0, 0]);
}

#[test]
fn empty_mesh_gives_empty_assignment() {
    let a = partition_columns(&point_mesh(&[]), ColumnGrid::new(3, 2).unwrap()).unwrap();
    assert!(a.is_empty());
    assert_eq!(a.num_parts(), 6);
}

#[test]
fn zero_counts_are_rejected() {
    let cfg = PartitionerConfig {
        num_parts_x: 0,
        num_parts_y: 3,
        ..Default::default()
    };
    assert!(matches!(
        ColumnPartitioner::new(&cfg),
        Err(PartitionError::InvalidPartitionCount { .. })
    ));
    assert!(ColumnGrid::new(usize::MAX, 2).is_err());
}

#[test]
fn structured_box_is_perfectly_balanced() {
    let mesh = box_tet_mesh(6, 4, 3, [0.0; 3], [6.0, 4.0, 3.0]).unwrap();
    let cfg = PartitionerConfig {
        num_parts_x: 3,
        num_parts_y: 2,
        ..Default::default()
    };
    let result = ColumnPartitioner::new(&cfg).unwrap().partition(&mesh).unwrap();
    assert_eq!(part_sizes(&result.assignment), vec![72; 6]);
    assert_eq!(imbalance(&result.assignment), 0.0);

    // Columns are ordered left to right and do not overlap.
    let cols: Vec<_> = result.layout.columns.iter().map(|c| c.unwrap()).collect();
    for w in cols.windows(2) {
        assert!(w[0].max <= w[1].min);
    }
}

#[test]
fn repeated_runs_agree() {
    let mesh = box_tet_mesh(5, 3, 2, [0.0; 3], [1.0; 3]).unwrap();
    let grid = ColumnGrid::new(4, 3).unwrap();
    let first = partition_columns(&mesh, grid).unwrap();
    let second = partition_columns(&mesh, grid).unwrap();
    assert_eq!(first, second);
}
