//! Print a partitioned mesh bundle, first as read by one rank, then as
//! distributed over every rank.

use clap::Parser;
use mesh_columns::algs::communicator::Communicator;
use mesh_columns::io::partitioned::{read_in_parallel, read_partitioned_mesh};
use mesh_columns::mesh::PartitionedMesh;
use mesh_columns::mesh_error::MeshColumnsError;
use mesh_columns::report::{
    Reporter, for_each_rank_in_order, print_partition_data, print_partitioned_mesh,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Partitioned mesh bundle written by partition-columns
    input: PathBuf,

    /// Pass `verbose` to list every cell and node
    #[arg(value_parser = ["verbose"])]
    verbose: Option<String>,

    /// Number of in-process ranks
    #[cfg(not(feature = "mpi-support"))]
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    ranks: u64,
}

fn print_serial(input: &Path, mesh: &PartitionedMesh, verbose: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Serial read of {}", input.display())?;
    print_partitioned_mesh(&mut out, Reporter::Designated, mesh, verbose)?;
    out.flush()
}

/// Every rank reaches every barrier even when its own output fails; errors
/// are returned only after the last collective step.
fn run<C: Communicator>(comm: &C, input: &Path, verbose: bool) -> Result<(), MeshColumnsError> {
    let reporter = Reporter::for_rank(comm, 0);
    let serial = reporter
        .is_designated()
        .then(|| read_partitioned_mesh(input));
    let mut output = Ok(());
    if let Some(Ok(mesh)) = &serial {
        output = print_serial(input, mesh, verbose);
    }
    comm.barrier();

    let data = read_in_parallel(input, comm);
    if reporter.is_designated() && output.is_ok() {
        output = writeln!(io::stdout(), "Parallel read over {} ranks", comm.size());
    }
    comm.barrier();
    let ordered = for_each_rank_in_order(comm, || {
        let mut out = io::stdout().lock();
        match &data {
            Ok(d) => print_partition_data(&mut out, Reporter::Designated, d, verbose)?,
            Err(e) => writeln!(io::stderr(), "rank {}: {e}", comm.rank())?,
        }
        out.flush()
    });

    if let Some(Err(e)) = serial {
        return Err(e);
    }
    output?;
    ordered?;
    data.map(|_| ())
}

#[cfg(not(feature = "mpi-support"))]
fn launch(args: &Args) -> Result<(), MeshColumnsError> {
    use mesh_columns::algs::communicator::RayonComm;

    let verbose = args.verbose.is_some();
    let comms = RayonComm::group(args.ranks as usize);
    let results: Vec<Result<(), MeshColumnsError>> = std::thread::scope(|s| {
        let handles: Vec<_> = comms
            .iter()
            .map(|comm| s.spawn(move || run(comm, &args.input, verbose)))
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(MeshColumnsError::CommFailure("rank panicked".into())))
            })
            .collect()
    });
    results.into_iter().collect()
}

#[cfg(feature = "mpi-support")]
fn launch(args: &Args) -> Result<(), MeshColumnsError> {
    use mesh_columns::algs::communicator::MpiComm;

    let comm = MpiComm::new()?;
    run(&comm, &args.input, args.verbose.is_some())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match launch(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("parallel-mesh-info: {e}");
            ExitCode::FAILURE
        }
    }
}
