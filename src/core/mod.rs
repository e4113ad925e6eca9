pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod trace;

pub use driver::{Diagnostic, Engine, Outcome};
pub use event::{Event, EventKind, EventQueue};
pub use state::{CpuState, ProcKey, ProcState, Process, ProcessSpec, Seq, SimState, Ticks};
pub use trace::{Segment, SegmentKind, Subject, Timeline};
