use log::info;

use super::{report::Report, workload::Workload};
use crate::core::{Engine, Ticks};
use crate::scheduler::Algorithm;

// Used by comparisons when the document names no quantum
pub const DEFAULT_QUANTUM: Ticks = 2;

pub struct Sim {
    pub engine: Engine,
}

impl Sim {
    // The workload must already have passed `Workload::validate`.
    pub fn new(workload: &Workload) -> Self {
        Self {
            engine: Engine::new(
                workload.policy(),
                workload.overhead,
                workload.processes.clone(),
            ),
        }
    }

    pub fn step(&mut self) {
        self.engine.step();
    }

    pub fn all_processes_completed(&self) -> bool {
        self.engine.is_done()
    }

    pub fn finish(self) -> Report {
        Report::from_outcome(self.engine.run())
    }
}

pub fn run(workload: &Workload) -> Report {
    Sim::new(workload).finish()
}

/// Runs every policy over the same processes, in `Algorithm::ALL` order.
pub fn compare(workload: &Workload) -> Vec<Report> {
    Algorithm::ALL
        .iter()
        .map(|&algorithm| {
            let mut variant = workload.with_algorithm(algorithm);
            if algorithm.needs_quantum() && !variant.quantum.is_some_and(|q| q > 0) {
                info!("{algorithm} has no quantum, using {DEFAULT_QUANTUM}");
                variant.quantum = Some(DEFAULT_QUANTUM);
            }
            run(&variant)
        })
        .collect()
}
