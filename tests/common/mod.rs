#![allow(dead_code)]

use sched_sim::{
    Algorithm, Report, Workload,
    core::{ProcessSpec, SegmentKind, Subject, Ticks},
    sim,
};

pub fn spec(id: &str, arrival: Ticks, burst: Ticks, deadline: Ticks, priority: i64) -> ProcessSpec {
    ProcessSpec {
        id: id.into(),
        arrival,
        burst,
        deadline,
        priority,
    }
}

pub fn run(
    algorithm: Algorithm,
    quantum: Option<Ticks>,
    overhead: Ticks,
    processes: Vec<ProcessSpec>,
) -> Report {
    let workload = Workload {
        algorithm,
        quantum,
        overhead,
        processes,
    };
    workload.validate().unwrap();
    sim::run(&workload)
}

pub fn row(report: &Report, id: &str) -> Vec<(Ticks, Ticks, SegmentKind)> {
    report
        .timeline
        .row(&Subject::Process(id.into()))
        .map(|seg| (seg.start, seg.end, seg.kind))
        .collect()
}
