//! Gmsh `.msh` reader for tetrahedral meshes.
//!
//! # Supported format
//! - ASCII `.msh` version **2.2**.
//! - Element type 4 (4-node tetrahedron) becomes a cell; every other element
//!   type (boundary triangles, lines, points, higher-order cells, ...) is
//!   skipped without inspecting its nodes.
//!
//! # Limitations
//! - Binary files are not supported.
//! - `.msh` v4.x (block-based) is not supported.
//! - Element tags are ignored.
//!
//! Gmsh node tags may be sparse; nodes are renumbered densely in the order
//! they appear in `$Nodes`.

use crate::io::MeshReader;
use crate::mesh::serial::{CellData, NODES_PER_CELL, NodeData, SerialMesh};
use crate::mesh_error::MeshColumnsError;
use hashbrown::HashMap;
use log::debug;
use std::io::Read;

const GMSH_TETRAHEDRON: u32 = 4;

fn parse_err(msg: impl Into<String>) -> MeshColumnsError {
    MeshColumnsError::MeshIoParse(msg.into())
}

/// Gmsh `.msh` reader for ASCII v2.2 meshes.
#[derive(Debug, Default, Clone)]
pub struct GmshReader;

impl GmshReader {
    fn parse_version(line: &str) -> Result<&str, MeshColumnsError> {
        let mut parts = line.split_whitespace();
        let version = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format version"))?;
        let file_type = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format type"))?;
        if file_type != "0" {
            return Err(parse_err("binary .msh files are not supported"));
        }
        Ok(version)
    }

    fn parse_tag(raw: &str) -> Result<u64, MeshColumnsError> {
        raw.parse::<u64>()
            .map_err(|_| parse_err(format!("invalid node id: {raw}")))
    }

    fn parse_coord(raw: Option<&str>, axis: &str) -> Result<f64, MeshColumnsError> {
        let raw = raw.ok_or_else(|| parse_err(format!("missing {axis} coordinate")))?;
        raw.parse::<f64>()
            .map_err(|_| parse_err(format!("invalid coordinate: {raw}")))
    }

    fn parse_count(line: Option<&str>, what: &str) -> Result<usize, MeshColumnsError> {
        let line = line.ok_or_else(|| parse_err(format!("missing {what} count")))?;
        line.trim()
            .parse::<usize>()
            .map_err(|_| parse_err(format!("invalid {what} count: {line}")))
    }

    fn expect_end(line: Option<&str>, marker: &str) -> Result<(), MeshColumnsError> {
        match line {
            Some(l) if l.trim() == marker => Ok(()),
            _ => Err(parse_err(format!("missing {marker}"))),
        }
    }
}

impl MeshReader for GmshReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<SerialMesh, MeshColumnsError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines();

        let mut version: Option<String> = None;
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut dense: HashMap<u64, u64> = HashMap::new();
        let mut tets: Vec<[u64; NODES_PER_CELL]> = Vec::new();
        let mut skipped = 0usize;

        while let Some(line) = lines.next() {
            match line.trim() {
                "$MeshFormat" => {
                    let format_line = lines.next().ok_or_else(|| parse_err("missing MeshFormat"))?;
                    version = Some(Self::parse_version(format_line)?.to_string());
                    Self::expect_end(lines.next(), "$EndMeshFormat")?;
                }
                "$Nodes" => {
                    let node_count = Self::parse_count(lines.next(), "node")?;
                    nodes.reserve(node_count);
                    for _ in 0..node_count {
                        let node_line = lines
                            .next()
                            .ok_or_else(|| parse_err("unexpected end of node list"))?;
                        let mut parts = node_line.split_whitespace();
                        let raw = parts.next().ok_or_else(|| parse_err("missing node id"))?;
                        let tag = Self::parse_tag(raw)?;
                        let x = Self::parse_coord(parts.next(), "x")?;
                        let y = Self::parse_coord(parts.next(), "y")?;
                        let z = Self::parse_coord(parts.next(), "z")?;
                        if dense.insert(tag, nodes.len() as u64).is_some() {
                            return Err(parse_err(format!("duplicate node id: {tag}")));
                        }
                        nodes.push(NodeData::new(x, y, z));
                    }
                    Self::expect_end(lines.next(), "$EndNodes")?;
                }
                "$Elements" => {
                    let elem_count = Self::parse_count(lines.next(), "element")?;
                    for _ in 0..elem_count {
                        let elem_line = lines
                            .next()
                            .ok_or_else(|| parse_err("unexpected end of element list"))?;
                        let mut parts = elem_line.split_whitespace();
                        parts.next().ok_or_else(|| parse_err("missing element id"))?;
                        let elem_type = parts
                            .next()
                            .ok_or_else(|| parse_err("missing element type"))?
                            .parse::<u32>()
                            .map_err(|_| parse_err("invalid element type"))?;
                        let num_tags = parts
                            .next()
                            .ok_or_else(|| parse_err("missing element tag count"))?
                            .parse::<usize>()
                            .map_err(|_| parse_err("invalid element tag count"))?;
                        for _ in 0..num_tags {
                            parts.next();
                        }
                        if elem_type != GMSH_TETRAHEDRON {
                            skipped += 1;
                            continue;
                        }
                        let mut conn = [0u64; NODES_PER_CELL];
                        for c in &mut conn {
                            let raw = parts
                                .next()
                                .ok_or_else(|| parse_err("missing element node id"))?;
                            *c = Self::parse_tag(raw)?;
                        }
                        tets.push(conn);
                    }
                    Self::expect_end(lines.next(), "$EndElements")?;
                }
                _ => {
                    // ignore other sections
                }
            }
        }

        let version = version.unwrap_or_else(|| "2.2".to_string());
        if version != "2.2" {
            return Err(parse_err(format!("unsupported gmsh version: {version}")));
        }
        if skipped > 0 {
            debug!("gmsh: skipped {skipped} non-tetrahedral elements");
        }

        let cells = tets
            .into_iter()
            .map(|conn| {
                let mut b = [0u64; NODES_PER_CELL];
                for (dst, tag) in b.iter_mut().zip(conn) {
                    *dst = *dense.get(&tag).ok_or_else(|| {
                        parse_err(format!("element references unknown node {tag}"))
                    })?;
                }
                Ok(CellData::new(b))
            })
            .collect::<Result<Vec<_>, MeshColumnsError>>()?;

        Ok(SerialMesh::from_parts(nodes, cells)?)
    }
}
