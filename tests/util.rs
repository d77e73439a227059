#![allow(dead_code)]
use mesh_columns::mesh::{CellData, NodeData, SerialMesh};

/// One degenerate tet per point: all four nodes sit on `p`, so the centroid
/// is exactly `p`.
pub fn point_mesh(points: &[[f64; 3]]) -> SerialMesh {
    let mut mesh = SerialMesh::new();
    for &[x, y, z] in points {
        let n = mesh.push_node(NodeData::new(x, y, z));
        mesh.push_cell(CellData::new([n; 4])).unwrap();
    }
    mesh
}

/// Eight unit-cube corners.
pub fn cube_corners() -> Vec<[f64; 3]> {
    let mut pts = Vec::new();
    for x in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for z in [0.0, 1.0] {
                pts.push([x, y, z]);
            }
        }
    }
    pts
}

/// Run `f` on every rank of an in-process group, returning results by rank.
pub fn on_ranks<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mesh_columns::algs::communicator::RayonComm) -> T + Sync,
{
    let comms = mesh_columns::algs::communicator::RayonComm::group(size);
    let f = &f;
    std::thread::scope(|s| {
        let handles: Vec<_> = comms.iter().map(|c| s.spawn(move || f(c))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}
