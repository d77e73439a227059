//! Communication backends shared by the parallel readers and tools.

pub mod communicator;

pub use communicator::{Communicator, NoComm, RayonComm, Wait};
#[cfg(feature = "mpi-support")]
pub use communicator::MpiComm;
