mod common;

use common::{row, run, spec};
use sched_sim::{
    Algorithm, Report, Sim, Workload,
    core::{SegmentKind, Subject},
    sim::{self, SyntheticParams, synthetic},
};

fn synthetic_workload(algorithm: Algorithm, overhead: u64, seed: u64) -> Workload {
    let params = SyntheticParams {
        ticks: 40,
        p_arrival: 0.4,
        seed,
        ..Default::default()
    };
    synthetic::workload(&params, algorithm, Some(3), overhead)
}

fn all_reports() -> Vec<Report> {
    let mut reports = Vec::new();
    for seed in 0..4 {
        for overhead in [0, 1, 2] {
            reports.extend(sim::compare(&synthetic_workload(Algorithm::Fifo, overhead, seed)));
        }
    }
    reports
}

#[test]
fn identical_input_gives_identical_output() {
    for algorithm in Algorithm::ALL {
        let workload = synthetic_workload(algorithm, 1, 11);
        let first = serde_json::to_string(&sim::run(&workload)).unwrap();
        let second = serde_json::to_string(&sim::run(&workload)).unwrap();
        assert_eq!(first, second, "{algorithm} is not deterministic");
    }
}

#[test]
fn executed_time_equals_burst() {
    for report in all_reports() {
        for p in &report.processes {
            assert_eq!(
                report.timeline.executed(&p.id),
                p.burst,
                "{} under {}",
                p.id,
                report.algorithm
            );
            assert!(p.finish <= report.metrics.total_time);
            assert_eq!(p.turnaround, p.finish - p.arrival);
            assert_eq!(p.waiting, p.turnaround - p.burst);
        }
    }
}

#[test]
fn every_row_tiles_the_run() {
    for report in all_reports() {
        let horizon = report.metrics.total_time;
        let subjects = report
            .processes
            .iter()
            .map(|p| Subject::Process(p.id.clone()))
            .chain([Subject::Idle]);

        for subject in subjects {
            let tiled = report.timeline.tiled_row(&subject, horizon);
            let mut cursor = 0;
            for seg in &tiled {
                assert_eq!(seg.start, cursor, "gap or overlap on {subject:?}");
                assert!(seg.start < seg.end);
                cursor = seg.end;
            }
            assert_eq!(cursor, horizon, "{subject:?} does not reach the end");
        }
    }
}

#[test]
fn cpu_time_is_fully_accounted() {
    // Executing, switching or idle: exactly one at every instant
    for report in all_reports() {
        let busy: u64 = report.segments().iter().map(|seg| seg.len()).sum();
        assert_eq!(busy, report.metrics.total_time, "{}", report.algorithm);
    }
}

#[test]
fn execution_past_deadline_is_split() {
    let report = run(Algorithm::Fifo, None, 0, vec![spec("P1", 3, 4, 5, 1)]);
    assert_eq!(
        row(&report, "P1"),
        vec![(3, 5, SegmentKind::Execution), (5, 7, SegmentKind::Overshoot)]
    );
    assert!(!report.process("P1").unwrap().met_deadline);
    assert_eq!(report.metrics.deadlines_missed, 1);
}

#[test]
fn idle_cpu_before_first_arrival() {
    let report = run(Algorithm::Fifo, None, 0, vec![spec("P1", 3, 2, 10, 1)]);
    let idle: Vec<_> = report
        .timeline
        .row(&Subject::Idle)
        .map(|seg| (seg.start, seg.end))
        .collect();
    assert_eq!(idle, vec![(0, 3)]);
    assert_eq!(report.metrics.total_time, 5);
    assert_eq!(report.metrics.idle_percent, 3.0 / 5.0 * 100.0);
}

#[test]
fn single_process_metrics() {
    let report = run(Algorithm::Fifo, None, 0, vec![spec("P1", 0, 4, 10, 1)]);
    let p1 = report.process("P1").unwrap();
    assert_eq!(p1.finish, 4);
    assert_eq!(p1.turnaround, 4);
    assert_eq!(p1.waiting, 0);
    assert!(p1.met_deadline);

    let m = &report.metrics;
    assert_eq!(m.total_time, 4);
    assert_eq!(m.throughput, 0.25);
    assert_eq!(m.idle_percent, 0.0);
    assert_eq!(m.context_switches, 0);
    assert_eq!(m.mean_turnaround, 4.0);
    assert_eq!(m.mean_waiting, 0.0);
}

#[test]
fn stepping_matches_running() {
    let workload = synthetic_workload(Algorithm::Rr, 1, 5);

    let mut stepped = Sim::new(&workload);
    let mut steps = 0;
    while !stepped.all_processes_completed() {
        stepped.step();
        steps += 1;
    }
    assert!(steps > 0);
    assert_eq!(stepped.engine.observed_steps(), steps);

    let a = serde_json::to_string(&stepped.finish()).unwrap();
    let b = serde_json::to_string(&sim::run(&workload)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn processes_are_reported_in_display_order() {
    let report = run(
        Algorithm::Fifo,
        None,
        0,
        vec![spec("P10", 0, 1, 5, 1), spec("P2", 0, 1, 5, 1), spec("P1", 0, 1, 5, 1)],
    );
    let ids: Vec<_> = report.processes.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P10"]);
    // Dispatch still follows input order
    assert_eq!(report.process("P10").unwrap().starts, vec![0]);
}

#[test]
fn demo_workload_runs_under_every_policy() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/workload.json");
    let workload = Workload::from_path(&path).unwrap();
    assert_eq!(workload.algorithm, Algorithm::Rr);

    let reports = sim::compare(&workload);
    assert_eq!(reports.len(), Algorithm::ALL.len());
    for report in &reports {
        assert_eq!(report.metrics.completed, 4);
        let burst: u64 = report.processes.iter().map(|p| p.burst).sum();
        assert!(report.metrics.total_time >= burst);
    }
    // RR (index 2) preempts on quantum expiry and pays the overhead
    assert!(reports[2].metrics.context_switches > 0);
}
