use average::Mean;
use serde::Serialize;

use crate::core::{Diagnostic, Outcome, Process, Segment, Seq, Ticks, Timeline};
use crate::scheduler::Algorithm;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub id: String,
    pub seq: Seq,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub deadline: Ticks,
    pub priority: i64,
    pub starts: Vec<Ticks>,
    pub finish: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub met_deadline: bool,
    pub vruntime: f64,
}

impl ProcessReport {
    fn from_process(proc: &Process) -> Self {
        let finish = proc.finish.expect("Process never finished");
        let turnaround = finish - proc.arrival;
        debug_assert!(turnaround >= proc.burst, "{} finished too early", proc.id);

        Self {
            id: proc.id.clone(),
            seq: proc.seq,
            arrival: proc.arrival,
            burst: proc.burst,
            deadline: proc.deadline,
            priority: proc.priority,
            starts: proc.starts.clone(),
            finish,
            turnaround,
            waiting: turnaround - proc.burst,
            met_deadline: finish <= proc.deadline,
            vruntime: proc.vruntime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_time: Ticks,
    pub completed: usize,
    pub mean_turnaround: f64,
    pub mean_waiting: f64,
    // Completed processes per time unit
    pub throughput: f64,
    pub idle_percent: f64,
    pub context_switches: u64,
    pub deadlines_missed: usize,
}

impl Metrics {
    /// Ratios over a zero-length run or an empty process set are 0.
    pub fn compute(
        processes: &[ProcessReport],
        total_time: Ticks,
        idle_time: Ticks,
        context_switches: u64,
    ) -> Self {
        let completed = processes.len();
        let (mean_turnaround, mean_waiting) = if completed == 0 {
            (0.0, 0.0)
        } else {
            let turnaround: Mean = processes.iter().map(|p| p.turnaround as f64).collect();
            let waiting: Mean = processes.iter().map(|p| p.waiting as f64).collect();
            (turnaround.mean(), waiting.mean())
        };

        let (throughput, idle_percent) = if total_time == 0 {
            (0.0, 0.0)
        } else {
            (
                completed as f64 / total_time as f64,
                100.0 * idle_time as f64 / total_time as f64,
            )
        };

        Self {
            total_time,
            completed,
            mean_turnaround,
            mean_waiting,
            throughput,
            idle_percent,
            context_switches,
            deadlines_missed: processes.iter().filter(|p| !p.met_deadline).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub algorithm: Algorithm,
    pub timeline: Timeline,
    // Display order: numeric id suffix, then input order
    pub processes: Vec<ProcessReport>,
    pub metrics: Metrics,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn from_outcome(outcome: Outcome) -> Self {
        let mut ordered: Vec<&Process> = outcome.processes.iter().collect();
        ordered.sort_by_key(|p| (p.display_number(), p.seq));
        let processes: Vec<ProcessReport> =
            ordered.into_iter().map(ProcessReport::from_process).collect();

        let metrics = Metrics::compute(
            &processes,
            outcome.final_time,
            outcome.idle_time,
            outcome.context_switches,
        );

        Self {
            algorithm: outcome.policy.algorithm(),
            timeline: outcome.timeline,
            processes,
            metrics,
            diagnostics: outcome.diagnostics,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        self.timeline.segments()
    }

    pub fn process(&self, id: &str) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.id == id)
    }
}
