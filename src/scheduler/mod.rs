pub mod rank;
pub mod ready;

use std::cmp::Ordering;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::{Process, Seq, Ticks};
pub use rank::Rank;
pub use ready::ReadyQueue;

// Fair-share dispatches in fixed one-unit slices
pub const CFS_SLICE: Ticks = 1;
pub const CFS_WEIGHT_BASE: f64 = 1.25;
// Spreads simultaneous arrivals apart in virtual runtime, by input order
pub const VRUNTIME_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Fifo,
    Sjf,
    Rr,
    Edf,
    Cfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Fifo,
        Algorithm::Sjf,
        Algorithm::Rr,
        Algorithm::Edf,
        Algorithm::Cfs,
    ];

    pub fn needs_quantum(self) -> bool {
        matches!(self, Algorithm::Rr | Algorithm::Cfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Fifo => "FIFO",
            Algorithm::Sjf => "SJF",
            Algorithm::Rr => "RR",
            Algorithm::Edf => "EDF",
            Algorithm::Cfs => "CFS",
        };
        f.write_str(name)
    }
}

/// Outcome of handing the CPU to a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub len: Ticks,
    // Work remains after this slice; the process goes back to the ready queue
    pub expires: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fifo,
    Sjf,
    RoundRobin { quantum: Ticks },
    Edf,
    FairShare,
}

impl Policy {
    pub fn new(algorithm: Algorithm, quantum: Option<Ticks>) -> Self {
        match algorithm {
            Algorithm::Fifo => Policy::Fifo,
            Algorithm::Sjf => Policy::Sjf,
            Algorithm::Rr => Policy::RoundRobin {
                quantum: quantum
                    .filter(|&q| q > 0)
                    .expect("Round-robin requires a positive quantum"),
            },
            Algorithm::Edf => Policy::Edf,
            Algorithm::Cfs => Policy::FairShare,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Policy::Fifo => Algorithm::Fifo,
            Policy::Sjf => Algorithm::Sjf,
            Policy::RoundRobin { .. } => Algorithm::Rr,
            Policy::Edf => Algorithm::Edf,
            Policy::FairShare => Algorithm::Cfs,
        }
    }

    pub fn ready_queue(&self) -> ReadyQueue {
        match self {
            Policy::RoundRobin { .. } => ReadyQueue::new_fifo(),
            _ => ReadyQueue::new_priq(),
        }
    }

    pub fn initial_vruntime(&self, clock: Ticks, seq: Seq) -> f64 {
        match self {
            Policy::FairShare => clock as f64 + seq as f64 * VRUNTIME_EPSILON,
            _ => 0.0,
        }
    }

    // None means strict queue order
    pub fn rank(&self, proc: &Process) -> Option<Rank> {
        match self {
            Policy::Fifo => Some(Rank::by_ticks(proc.arrival, 0, proc.seq)),
            Policy::Sjf => Some(Rank::by_ticks(proc.burst, proc.arrival, proc.seq)),
            Policy::RoundRobin { .. } => None,
            Policy::Edf => Some(Rank::by_ticks(proc.deadline, proc.arrival, proc.seq)),
            Policy::FairShare => Some(Rank::by_vruntime(proc.vruntime, proc.priority, proc.seq)),
        }
    }

    /// Charges the next slice against `proc` and reports how long it runs.
    pub fn slice(&self, proc: &mut Process) -> Slice {
        debug_assert!(proc.remaining > 0, "Dispatching finished process {}", proc.id);

        let len = match self {
            Policy::Fifo | Policy::Sjf | Policy::Edf => proc.remaining,
            Policy::RoundRobin { quantum } => proc.remaining.min(*quantum),
            Policy::FairShare => {
                let len = proc.remaining.min(CFS_SLICE);
                proc.vruntime += len as f64 * weight(proc.priority);
                len
            }
        };
        proc.remaining -= len;

        Slice {
            len,
            expires: proc.remaining > 0,
        }
    }

    /// Whether `candidate`, just arrived, outranks the process on the CPU.
    /// Only deadline and fair-share policies ever answer yes.
    pub fn would_preempt(&self, candidate: &Process, running: &Process) -> bool {
        let order = match self {
            Policy::Edf => candidate
                .deadline
                .cmp(&running.deadline)
                .then(candidate.seq.cmp(&running.seq)),
            Policy::FairShare => candidate
                .vruntime
                .total_cmp(&running.vruntime)
                .then(candidate.priority.cmp(&running.priority))
                .then(candidate.seq.cmp(&running.seq)),
            _ => return false,
        };
        order == Ordering::Less
    }
}

// Lower priority numbers accumulate virtual runtime more slowly
pub fn weight(priority: i64) -> f64 {
    let exp = (priority - 1).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    CFS_WEIGHT_BASE.powi(exp)
}
