pub mod driver;
pub mod render;
pub mod report;
pub mod synthetic;
pub mod workload;

pub use driver::{Sim, compare, run};
pub use report::{Metrics, ProcessReport, Report};
pub use synthetic::SyntheticParams;
pub use workload::Workload;
