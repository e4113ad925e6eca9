use rand::prelude::*;

use super::workload::Workload;
use crate::core::{ProcessSpec, Ticks};
use crate::scheduler::Algorithm;

#[derive(Debug, Clone)]
pub struct SyntheticParams {
    // Arrival window; one Bernoulli trial per tick
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
    pub max_slack: Ticks,
    pub seed: u64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            ticks: 20,
            p_arrival: 0.3,
            p_short: 0.5,
            short_burst: 2,
            long_burst: 6,
            max_slack: 8,
            seed: 0,
        }
    }
}

pub fn generate(params: &SyntheticParams) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut procs = Vec::new();

    for t in 0..params.ticks {
        if rng.random::<f64>() < params.p_arrival {
            procs.push(random_process(&mut rng, params, t, procs.len()));
        }
    }

    if procs.is_empty() {
        procs.push(random_process(&mut rng, params, 0, 0));
    }

    procs
}

pub fn workload(
    params: &SyntheticParams,
    algorithm: Algorithm,
    quantum: Option<Ticks>,
    overhead: Ticks,
) -> Workload {
    Workload {
        algorithm,
        quantum,
        overhead,
        processes: generate(params),
    }
}

fn random_process(
    rng: &mut StdRng,
    params: &SyntheticParams,
    arrival: Ticks,
    index: usize,
) -> ProcessSpec {
    let burst = if rng.random::<f64>() < params.p_short {
        params.short_burst
    } else {
        params.long_burst
    }
    .max(1);

    ProcessSpec {
        id: format!("P{}", index + 1),
        arrival,
        burst,
        deadline: arrival + burst + rng.random_range(0..=params.max_slack),
        priority: rng.random_range(1..=5),
    }
}
