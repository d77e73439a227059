//! Partitioned mesh I/O with communicator-aware distribution.
//!
//! A partitioned mesh is stored as one JSON bundle holding every piece. It
//! can be read back whole ([`read_partitioned_mesh`]) or distributed across
//! ranks ([`read_in_parallel`]): the root rank reads the bundle and ships each
//! peer the pieces it owns. Node coordinates must be finite to be written.

use crate::algs::communicator::{Communicator, Wait};
use crate::io::ensure_finite;
use crate::mesh::partitioned::{GridShape, MeshPiece, PartitionedMesh};
use crate::mesh_error::MeshColumnsError;
use crate::partitioning::chunks::split_into_chunks;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

const PARTITIONED_MESH_VERSION: u32 = 1;
const SIZE_TAG: u16 = 0x5100;
const DATA_TAG: u16 = 0x5101;
const ROOT: usize = 0;

#[derive(Serialize)]
struct BundleRef<'a> {
    version: u32,
    #[serde(flatten)]
    mesh: &'a PartitionedMesh,
}

#[derive(Deserialize)]
struct Bundle {
    version: u32,
    #[serde(flatten)]
    mesh: PartitionedMesh,
}

/// The share of a partitioned mesh held by one rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionData {
    pub rank: usize,
    pub num_ranks: usize,
    pub num_parts: usize,
    pub grid: Option<GridShape>,
    pub num_global_cells: u64,
    pub num_global_nodes: u64,
    /// Owned pieces in ascending partition order.
    pub pieces: Vec<MeshPiece>,
}

impl PartitionData {
    /// Select the pieces `rank` owns out of `num_ranks`.
    pub fn from_mesh(
        mesh: &PartitionedMesh,
        rank: usize,
        num_ranks: usize,
    ) -> Result<Self, MeshColumnsError> {
        let range = owned_parts(mesh.num_parts, rank, num_ranks)?;
        let pieces = mesh.pieces.get(range.clone()).ok_or_else(|| {
            MeshColumnsError::MeshIoParse(format!(
                "partitions {range:?} requested but the mesh holds {} pieces",
                mesh.pieces.len()
            ))
        })?;
        Ok(Self {
            rank,
            num_ranks,
            num_parts: mesh.num_parts,
            grid: mesh.grid,
            num_global_cells: mesh.num_global_cells,
            num_global_nodes: mesh.num_global_nodes,
            pieces: pieces.to_vec(),
        })
    }

    pub fn num_local_cells(&self) -> usize {
        self.pieces.iter().map(MeshPiece::num_cells).sum()
    }
}

/// Partition ids owned by `rank`: chunk `rank` of `num_parts` split over
/// `num_ranks`.
pub fn owned_parts(
    num_parts: usize,
    rank: usize,
    num_ranks: usize,
) -> Result<Range<usize>, MeshColumnsError> {
    if rank >= num_ranks {
        return Err(MeshColumnsError::CommFailure(format!(
            "rank {rank} outside communicator of size {num_ranks}"
        )));
    }
    let bounds = split_into_chunks(num_parts, num_ranks)?;
    Ok(bounds[rank]..bounds[rank + 1])
}

pub fn write_partitioned_mesh(
    path: impl AsRef<Path>,
    mesh: &PartitionedMesh,
) -> Result<(), MeshColumnsError> {
    ensure_finite(
        mesh.pieces
            .iter()
            .flat_map(|p| &p.nodes)
            .chain(&mesh.unattached_nodes)
            .map(|n| (n.global, &n.coords)),
    )?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(
        &mut out,
        &BundleRef {
            version: PARTITIONED_MESH_VERSION,
            mesh,
        },
    )?;
    out.flush()?;
    Ok(())
}

pub fn read_partitioned_mesh(path: impl AsRef<Path>) -> Result<PartitionedMesh, MeshColumnsError> {
    let bundle: Bundle = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    if bundle.version != PARTITIONED_MESH_VERSION {
        return Err(MeshColumnsError::MeshIoParse(format!(
            "unsupported partitioned mesh version {} (expected {PARTITIONED_MESH_VERSION})",
            bundle.version
        )));
    }
    let mesh = bundle.mesh;
    if mesh.pieces.len() != mesh.num_parts {
        return Err(MeshColumnsError::MeshIoParse(format!(
            "bundle declares {} partitions but holds {} pieces",
            mesh.num_parts,
            mesh.pieces.len()
        )));
    }
    if let Some((idx, piece)) = mesh
        .pieces
        .iter()
        .enumerate()
        .find(|(idx, piece)| piece.part != *idx as u64)
    {
        return Err(MeshColumnsError::MeshIoParse(format!(
            "piece {idx} is labelled partition {}",
            piece.part
        )));
    }
    Ok(mesh)
}

/// Read a partitioned mesh across all ranks of `comm`.
///
/// Rank 0 reads the file and sends every other rank its share; a zero-length
/// header tells peers the root failed, so no rank blocks forever on a bad
/// file.
pub fn read_in_parallel<C>(
    path: impl AsRef<Path>,
    comm: &C,
) -> Result<PartitionData, MeshColumnsError>
where
    C: Communicator,
{
    let path = path.as_ref();
    let rank = comm.rank();
    let size = comm.size();

    if rank == ROOT {
        let mesh = match read_partitioned_mesh(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                for peer in (0..size).filter(|&p| p != ROOT) {
                    let _ = comm.isend(peer, SIZE_TAG, bytemuck::bytes_of(&0u64)).wait();
                }
                return Err(e);
            }
        };
        for peer in (0..size).filter(|&p| p != ROOT) {
            let payload = serde_json::to_vec(&PartitionData::from_mesh(&mesh, peer, size)?)?;
            debug!("sending {} bytes of partition data to rank {peer}", payload.len());
            let header = payload.len() as u64;
            let _ = comm.isend(peer, SIZE_TAG, bytemuck::bytes_of(&header)).wait();
            let _ = comm.isend(peer, DATA_TAG, &payload).wait();
        }
        PartitionData::from_mesh(&mesh, ROOT, size)
    } else {
        let mut size_buf = [0u8; 8];
        let header = comm
            .irecv(ROOT, SIZE_TAG, &mut size_buf)
            .wait()
            .filter(|buf| buf.len() == size_buf.len())
            .map(|buf| bytemuck::pod_read_unaligned::<u64>(&buf))
            .ok_or_else(|| MeshColumnsError::CommFailure("failed to receive size header".into()))?;
        if header == 0 {
            return Err(MeshColumnsError::CommFailure(format!(
                "root rank failed to read {}",
                path.display()
            )));
        }
        let len = usize::try_from(header)
            .map_err(|_| MeshColumnsError::CommFailure(format!("payload of {header} bytes")))?;
        let mut data_buf = vec![0u8; len];
        let payload = comm
            .irecv(ROOT, DATA_TAG, &mut data_buf)
            .wait()
            .ok_or_else(|| {
                MeshColumnsError::CommFailure("failed to receive partition data".into())
            })?;
        if payload.len() != len {
            return Err(MeshColumnsError::CommFailure(
                "partition data length mismatch".into(),
            ));
        }
        Ok(serde_json::from_slice(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_parts_chunks_partition_ids() {
        assert_eq!(owned_parts(10, 0, 3).unwrap(), 0..4);
        assert_eq!(owned_parts(10, 1, 3).unwrap(), 4..7);
        assert_eq!(owned_parts(10, 2, 3).unwrap(), 7..10);
        assert_eq!(owned_parts(2, 3, 4).unwrap(), 2..2);
        assert!(owned_parts(4, 4, 4).is_err());
    }

    #[test]
    fn missing_pieces_are_an_error() {
        let mesh = PartitionedMesh {
            num_parts: 4,
            grid: None,
            num_global_cells: 0,
            num_global_nodes: 0,
            pieces: Vec::new(),
            unattached_nodes: Vec::new(),
        };
        assert!(matches!(
            PartitionData::from_mesh(&mesh, 1, 2),
            Err(MeshColumnsError::MeshIoParse(_))
        ));
    }
}
