pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use error::WorkloadError;
pub use scheduler::{Algorithm, Policy};
pub use sim::{Report, Sim, Workload};
