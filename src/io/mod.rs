//! Mesh I/O helpers.
//!
//! Readers and writers for serial meshes are trait-based so the tools can
//! pick a format by file extension; partitioned meshes have a single bundle
//! format in [`partitioned`].

pub mod gmsh;
pub mod partitioned;
pub mod serial;

use crate::mesh::serial::SerialMesh;
use crate::mesh_error::MeshColumnsError;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Trait for mesh readers that produce a serial mesh.
pub trait MeshReader {
    /// Parse a mesh from a reader. The result is validated.
    fn read<R: Read>(&self, reader: R) -> Result<SerialMesh, MeshColumnsError>;
}

/// Trait for mesh writers that serialize a serial mesh.
pub trait MeshWriter {
    fn write<W: Write>(&self, writer: W, mesh: &SerialMesh) -> Result<(), MeshColumnsError>;
}

/// JSON has no encoding for NaN or infinity, so writers refuse such nodes
/// instead of emitting `null`.
pub(crate) fn ensure_finite<'a>(
    nodes: impl IntoIterator<Item = (u64, &'a [f64; 3])>,
) -> Result<(), MeshColumnsError> {
    match nodes
        .into_iter()
        .find(|(_, c)| !c.iter().all(|v| v.is_finite()))
    {
        Some((node, coords)) => Err(MeshColumnsError::InvalidGeometry(format!(
            "node {node} has non-finite coordinates {coords:?}"
        ))),
        None => Ok(()),
    }
}

/// Read a serial mesh, choosing the format from the extension: `.msh` is
/// Gmsh, anything else the JSON serial format.
pub fn read_mesh_auto(path: impl AsRef<Path>) -> Result<SerialMesh, MeshColumnsError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("msh") => gmsh::GmshReader.read(reader),
        _ => serial::JsonMeshFormat.read(reader),
    }
}
