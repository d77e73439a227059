mod util;

use mesh_columns::io::partitioned::{
    PartitionData, read_in_parallel, read_partitioned_mesh, write_partitioned_mesh,
};
use mesh_columns::io::read_mesh_auto;
use mesh_columns::io::serial::write_serial_mesh;
use mesh_columns::mesh::{PartitionedMesh, SerialMesh, box_tet_mesh};
use mesh_columns::mesh_error::MeshColumnsError;
use mesh_columns::partitioning::{ColumnGrid, PartitionAssignment, partition_columns};
use tempfile::tempdir;
use util::on_ranks;

fn partitioned_box(grid: ColumnGrid) -> (SerialMesh, PartitionAssignment, PartitionedMesh) {
    let mesh = box_tet_mesh(4, 3, 2, [0.0; 3], [4.0, 3.0, 2.0]).unwrap();
    let a = partition_columns(&mesh, grid).unwrap();
    let pm = PartitionedMesh::from_serial(&mesh, &a, grid.num_parts())
        .unwrap()
        .with_grid(grid);
    (mesh, a, pm)
}

#[test]
fn bundle_file_round_trip_reassembles_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mesh.part.json");
    let (mesh, a, pm) = partitioned_box(ColumnGrid::new(2, 3).unwrap());

    write_partitioned_mesh(&path, &pm).unwrap();
    let back = read_partitioned_mesh(&path).unwrap();
    assert_eq!(back, pm);

    let (mesh_back, a_back) = back.assemble().unwrap();
    assert_eq!(mesh_back, mesh);
    assert_eq!(a_back, a);
}

#[test]
fn pieces_cover_every_cell_once() {
    let (mesh, a, pm) = partitioned_box(ColumnGrid::new(3, 2).unwrap());
    let mut seen = vec![0usize; mesh.num_cells()];
    for piece in &pm.pieces {
        for cell in &piece.cells {
            seen[cell.global as usize] += 1;
            assert_eq!(a.part_of(cell.global as usize), piece.part);
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn serial_json_is_read_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("box.json");
    let mesh = box_tet_mesh(2, 2, 2, [0.0; 3], [1.0; 3]).unwrap();
    write_serial_mesh(&path, &mesh).unwrap();
    assert_eq!(read_mesh_auto(&path).unwrap(), mesh);
}

#[test]
fn gmsh_is_read_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tet.msh");
    std::fs::write(
        &path,
        "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n$Nodes\n4\n1 0 0 0\n2 1 0 0\n3 0 1 0\n4 0 0 1\n$EndNodes\n$Elements\n1\n1 4 0 1 2 3 4\n$EndElements\n",
    )
    .unwrap();
    let mesh = read_mesh_auto(&path).unwrap();
    assert_eq!(mesh.num_cells(), 1);
    assert_eq!(mesh.cells()[0].bounding_nodes, [0, 1, 2, 3]);
}

#[test]
fn non_finite_nodes_are_refused_before_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nan.part.json");
    let (_, _, mut pm) = partitioned_box(ColumnGrid::new(2, 1).unwrap());
    pm.pieces[1].nodes[0].coords[2] = f64::INFINITY;
    assert!(matches!(
        write_partitioned_mesh(&path, &pm),
        Err(MeshColumnsError::InvalidGeometry(_))
    ));
    assert!(!path.exists());
}

#[test]
fn truncated_bundle_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"version": 1, "num_parts": 2"#).unwrap();
    assert!(matches!(
        read_partitioned_mesh(&path),
        Err(MeshColumnsError::MeshIoParse(_))
    ));
}

#[test]
fn parallel_read_distributes_pieces_by_rank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mesh.part.json");
    let (_, _, pm) = partitioned_box(ColumnGrid::new(5, 1).unwrap());
    write_partitioned_mesh(&path, &pm).unwrap();

    let got = on_ranks(3, |comm| read_in_parallel(&path, comm).unwrap());
    let owned: Vec<Vec<u64>> = got
        .iter()
        .map(|d| d.pieces.iter().map(|p| p.part).collect())
        .collect();
    assert_eq!(owned, vec![vec![0, 1], vec![2, 3], vec![4]]);
    for (rank, data) in got.iter().enumerate() {
        assert_eq!(data, &PartitionData::from_mesh(&pm, rank, 3).unwrap());
    }
    let total: usize = got.iter().map(PartitionData::num_local_cells).sum();
    assert_eq!(total as u64, pm.num_global_cells);
}

#[test]
fn more_ranks_than_parts_leaves_some_ranks_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mesh.part.json");
    let (_, _, pm) = partitioned_box(ColumnGrid::new(2, 1).unwrap());
    write_partitioned_mesh(&path, &pm).unwrap();

    let got = on_ranks(4, |comm| read_in_parallel(&path, comm).unwrap());
    let counts: Vec<usize> = got.iter().map(|d| d.pieces.len()).collect();
    assert_eq!(counts, vec![1, 1, 0, 0]);
}

#[test]
fn missing_file_fails_on_every_rank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let got = on_ranks(3, |comm| read_in_parallel(&path, comm));
    assert!(matches!(got[0], Err(MeshColumnsError::Io(_))));
    assert!(matches!(got[1], Err(MeshColumnsError::CommFailure(_))));
    assert!(matches!(got[2], Err(MeshColumnsError::CommFailure(_))));
}
