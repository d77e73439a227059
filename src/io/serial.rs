//! JSON serial mesh store.
//!
//! ```json
//! { "version": 1, "nodes": [[0.0, 0.0, 0.0], ...], "cells": [[0, 1, 2, 3], ...] }
//! ```
//!
//! Coordinates must be finite to be written.

use crate::io::{MeshReader, MeshWriter, ensure_finite};
use crate::mesh::serial::{CellData, NodeData, SerialMesh};
use crate::mesh_error::MeshColumnsError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const SERIAL_MESH_VERSION: u32 = 1;

#[derive(Serialize)]
struct SerialMeshDocRef<'a> {
    version: u32,
    nodes: &'a [NodeData],
    cells: &'a [CellData],
}

#[derive(Deserialize)]
struct SerialMeshDoc {
    version: u32,
    nodes: Vec<NodeData>,
    cells: Vec<CellData>,
}

/// Reader/writer for the JSON serial mesh format.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMeshFormat;

impl MeshReader for JsonMeshFormat {
    fn read<R: Read>(&self, reader: R) -> Result<SerialMesh, MeshColumnsError> {
        let doc: SerialMeshDoc = serde_json::from_reader(reader)?;
        if doc.version != SERIAL_MESH_VERSION {
            return Err(MeshColumnsError::MeshIoParse(format!(
                "unsupported serial mesh version {} (expected {SERIAL_MESH_VERSION})",
                doc.version
            )));
        }
        Ok(SerialMesh::from_parts(doc.nodes, doc.cells)?)
    }
}

impl MeshWriter for JsonMeshFormat {
    fn write<W: Write>(&self, writer: W, mesh: &SerialMesh) -> Result<(), MeshColumnsError> {
        ensure_finite(mesh.nodes().iter().enumerate().map(|(i, n)| (i as u64, &n.coords)))?;
        let doc = SerialMeshDocRef {
            version: SERIAL_MESH_VERSION,
            nodes: mesh.nodes(),
            cells: mesh.cells(),
        };
        serde_json::to_writer(writer, &doc)?;
        Ok(())
    }
}

pub fn read_serial_mesh(path: impl AsRef<Path>) -> Result<SerialMesh, MeshColumnsError> {
    JsonMeshFormat.read(BufReader::new(File::open(path)?))
}

pub fn write_serial_mesh(
    path: impl AsRef<Path>,
    mesh: &SerialMesh,
) -> Result<(), MeshColumnsError> {
    let mut out = BufWriter::new(File::create(path)?);
    JsonMeshFormat.write(&mut out, mesh)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generation::box_tet_mesh;

    #[test]
    fn json_layout_is_plain_arrays() {
        let mut mesh = SerialMesh::new();
        for i in 0..4 {
            mesh.push_node(NodeData::new(i as f64, 0.0, 0.5));
        }
        mesh.push_cell(CellData::new([0, 1, 2, 3])).unwrap();
        let mut buf = Vec::new();
        JsonMeshFormat.write(&mut buf, &mesh).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["nodes"][2], serde_json::json!([2.0, 0.0, 0.5]));
        assert_eq!(v["cells"][0], serde_json::json!([0, 1, 2, 3]));
    }

    #[test]
    fn read_back_written_mesh() {
        let mesh = box_tet_mesh(2, 1, 1, [0.0; 3], [2.0, 1.0, 1.0]).unwrap();
        let mut buf = Vec::new();
        JsonMeshFormat.write(&mut buf, &mesh).unwrap();
        assert_eq!(JsonMeshFormat.read(buf.as_slice()).unwrap(), mesh);
    }

    #[test]
    fn non_finite_coordinates_are_not_written() {
        let mut mesh = SerialMesh::new();
        mesh.push_node(NodeData::new(0.0, f64::NAN, 0.0));
        mesh.push_node(NodeData::new(1.0, 0.0, 0.0));
        let mut buf = Vec::new();
        assert!(matches!(
            JsonMeshFormat.write(&mut buf, &mesh),
            Err(MeshColumnsError::InvalidGeometry(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let text = r#"{"version": 7, "nodes": [], "cells": []}"#;
        assert!(matches!(
            JsonMeshFormat.read(text.as_bytes()),
            Err(MeshColumnsError::MeshIoParse(_))
        ));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let text = r#"{"version": 1, "nodes": [[0,0,0]], "cells": [[0,0,0,4]]}"#;
        assert!(matches!(
            JsonMeshFormat.read(text.as_bytes()),
            Err(MeshColumnsError::Partition(_))
        ));
    }
}
