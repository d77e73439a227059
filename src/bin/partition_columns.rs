//! Partition a tetrahedral mesh into a grid of vertical columns and write the
//! partitioned bundle.

use clap::Parser;
use log::info;
use mesh_columns::io::partitioned::write_partitioned_mesh;
use mesh_columns::io::read_mesh_auto;
use mesh_columns::mesh::PartitionedMesh;
use mesh_columns::mesh_error::MeshColumnsError;
use mesh_columns::partitioning::{
    ColumnPartitioner, PartitionerConfig, imbalance, node_replication_factor,
};
use mesh_columns::report::{MeshSummary, Reporter, print_partitioned_mesh};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of partitions along X
    num_parts_x: usize,

    /// Number of partitions along Y within each column
    num_parts_y: usize,

    /// Serial mesh (.json, or .msh for Gmsh ASCII 2.2)
    input: PathBuf,

    /// Where the partitioned bundle is written
    output: PathBuf,

    /// Only log cell counts of partitions below this id
    #[arg(long, default_value_t = 100)]
    report_limit: usize,
}

fn run(args: &Args) -> Result<(), MeshColumnsError> {
    let cfg = PartitionerConfig {
        num_parts_x: args.num_parts_x,
        num_parts_y: args.num_parts_y,
        report_limit: args.report_limit,
    };
    let partitioner = ColumnPartitioner::new(&cfg)?;

    let mesh = read_mesh_auto(&args.input)?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", MeshSummary::of_serial(&mesh))?;

    let start = Instant::now();
    let result = partitioner.partition(&mesh)?;
    let elapsed = start.elapsed();
    info!("partitioned {} cells in {elapsed:?}", mesh.num_cells());

    let grid = partitioner.grid();
    let partitioned =
        PartitionedMesh::from_serial(&mesh, &result.assignment, grid.num_parts())?.with_grid(grid);
    write_partitioned_mesh(&args.output, &partitioned)?;

    print_partitioned_mesh(&mut stdout, Reporter::Designated, &partitioned, false)?;
    writeln!(
        stdout,
        "Imbalance {:.4}",
        imbalance(&result.assignment)
    )?;
    writeln!(
        stdout,
        "Node replication {:.4}",
        node_replication_factor(&mesh, &result.assignment)
    )?;
    writeln!(stdout, "Execution time {elapsed:?}")?;
    writeln!(stdout, "Wrote {}", args.output.display())?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("partition-columns: {e}");
            ExitCode::FAILURE
        }
    }
}
