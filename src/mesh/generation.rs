//! Structured tetrahedral mesh generator.

use crate::mesh::serial::{CellData, NodeData, SerialMesh};
use crate::mesh_error::MeshColumnsError;

fn invalid_geometry(message: impl Into<String>) -> MeshColumnsError {
    MeshColumnsError::InvalidGeometry(message.into())
}

/// Corner indices of the six tetrahedra sharing the `v0`-`v6` diagonal.
const KUHN_TETS: [[usize; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
    [0, 5, 1, 6],
];

/// Generate a box over `[min, max]` with `nx`×`ny`×`nz` hexahedra, each split
/// into six tetrahedra.
///
/// Nodes are numbered x fastest, then y, then z. Cells of one hexahedron are
/// consecutive.
pub fn box_tet_mesh(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<SerialMesh, MeshColumnsError> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(invalid_geometry("nx, ny, and nz must be positive"));
    }
    if (0..3).any(|d| !(max[d] > min[d])) {
        return Err(invalid_geometry(format!(
            "empty box: min = {min:?}, max = {max:?}"
        )));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let dz = (max[2] - min[2]) / nz as f64;
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        let z = min[2] + dz * k as f64;
        for j in 0..=ny {
            let y = min[1] + dy * j as f64;
            for i in 0..=nx {
                let x = min[0] + dx * i as f64;
                nodes.push(NodeData::new(x, y, z));
            }
        }
    }

    let mut cells = Vec::with_capacity(6 * nx * ny * nz);
    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let base = k * slab_stride + j * row_stride + i;
                let v0 = base;
                let v1 = base + 1;
                let v3 = base + row_stride;
                let v2 = v3 + 1;
                let v4 = base + slab_stride;
                let v5 = v4 + 1;
                let v7 = v4 + row_stride;
                let v6 = v7 + 1;
                let hex = [v0, v1, v2, v3, v4, v5, v6, v7];
                for tet in KUHN_TETS {
                    cells.push(CellData::new(tet.map(|c| hex[c] as u64)));
                }
            }
        }
    }

    Ok(SerialMesh::from_parts(nodes, cells)?)
}
