use std::fmt::Write;

use super::report::{Metrics, Report};
use crate::core::{Diagnostic, SegmentKind, Subject};

const EXEC: char = '#';
const OVERSHOOT: char = '!';
const OVERHEAD: char = '~';
const IDLE: char = '-';
const EMPTY: char = '.';
const DEADLINE: char = '|';

fn glyph(kind: SegmentKind) -> char {
    match kind {
        SegmentKind::Execution => EXEC,
        SegmentKind::Overshoot => OVERSHOOT,
        SegmentKind::Overhead => OVERHEAD,
        SegmentKind::Idle => IDLE,
    }
}

// Wider runs are drawn with several time units per column
pub const MAX_COLUMNS: u64 = 120;

/// One column per time unit (or per `scale` units on long runs), one row per
/// process plus IDLE and CS rows when those sentinels appear. A `|` after a
/// cell marks a deadline falling inside the chart.
pub fn gantt(report: &Report) -> String {
    let horizon = report.metrics.total_time;
    let scale = horizon.div_ceil(MAX_COLUMNS).max(1);
    let columns = horizon.div_ceil(scale) as usize;

    let mut rows: Vec<(Subject, Option<u64>)> = report
        .processes
        .iter()
        .map(|p| (Subject::Process(p.id.clone()), Some(p.deadline)))
        .collect();
    for sentinel in [Subject::Idle, Subject::ContextSwitch] {
        if report.timeline.row(&sentinel).next().is_some() {
            rows.push((sentinel, None));
        }
    }

    let width = rows
        .iter()
        .map(|(subject, _)| subject.label().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (subject, deadline) in &rows {
        let mut cells = vec![EMPTY; columns];
        for seg in report.timeline.row(subject) {
            let first = (seg.start / scale) as usize;
            let last = (seg.end.div_ceil(scale) as usize).min(columns);
            for cell in &mut cells[first.min(last)..last] {
                *cell = glyph(seg.kind);
            }
        }

        let mut line: String = cells.into_iter().collect();
        if let Some(deadline) = deadline.filter(|&d| d > 0 && d < horizon) {
            line.insert(deadline.div_ceil(scale) as usize, DEADLINE);
        }
        let _ = writeln!(out, "{:>width$} {line}", subject.label());
    }

    // Labels every 5 columns, spread out when they would not fit
    let step = (horizon.to_string().len() + 1).next_multiple_of(5);
    let mut axis = String::new();
    for col in (0..=columns).step_by(step) {
        let _ = write!(axis, "{:<step$}", col as u64 * scale);
    }
    let _ = writeln!(out, "{:>width$} {}", "", axis.trim_end());
    if scale > 1 {
        let _ = writeln!(out, "1 column = {scale} units");
    }
    let _ = writeln!(
        out,
        "{EXEC} running  {OVERSHOOT} past deadline  {OVERHEAD} context switch  {IDLE} idle  {DEADLINE} deadline"
    );
    out
}

pub fn process_table(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>7} {:>5} {:>8} {:>4} {:<16} {:>6} {:>8} {:>10} {:>4}",
        "id", "arrival", "burst", "deadline", "prio", "starts", "finish", "waiting", "turnaround", "met"
    );
    for p in &report.processes {
        let starts = p
            .starts
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(
            out,
            "{:<8} {:>7} {:>5} {:>8} {:>4} {:<16} {:>6} {:>8.2} {:>10.2} {:>4}",
            p.id,
            p.arrival,
            p.burst,
            p.deadline,
            p.priority,
            starts,
            p.finish,
            p.waiting as f64,
            p.turnaround as f64,
            if p.met_deadline { "yes" } else { "NO" }
        );
    }
    out
}

pub fn metrics(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total time:          {} units", metrics.total_time);
    let _ = writeln!(out, "Mean turnaround:     {:.2} units", metrics.mean_turnaround);
    let _ = writeln!(out, "Mean waiting:        {:.2} units", metrics.mean_waiting);
    let _ = writeln!(out, "Throughput:          {:.3} processes/unit", metrics.throughput);
    let _ = writeln!(out, "CPU idle:            {:.2}%", metrics.idle_percent);
    let _ = writeln!(out, "Context switches:    {}", metrics.context_switches);
    let _ = writeln!(
        out,
        "Deadlines missed:    {}/{}",
        metrics.deadlines_missed, metrics.completed
    );
    out
}

pub fn diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        match diag {
            Diagnostic::PreemptionSkipped {
                time,
                candidate,
                running,
            } => {
                let _ = writeln!(
                    out,
                    "t={time}: {candidate} outranks running {running} (not preempted)"
                );
            }
        }
    }
    out
}

pub fn report(report: &Report) -> String {
    let mut out = format!("== {} ==\n\n", report.algorithm);
    out.push_str(&gantt(report));
    out.push('\n');
    out.push_str(&process_table(report));
    out.push('\n');
    out.push_str(&metrics(&report.metrics));
    if !report.diagnostics.is_empty() {
        out.push('\n');
        out.push_str(&diagnostics(&report.diagnostics));
    }
    out
}

pub fn comparison(reports: &[Report]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:>6} {:>10} {:>8} {:>10} {:>7} {:>4} {:>7}",
        "alg", "total", "turnaround", "waiting", "throughput", "idle%", "cs", "missed"
    );
    for r in reports {
        let m = &r.metrics;
        let _ = writeln!(
            out,
            "{:<5} {:>6} {:>10.2} {:>8.2} {:>10.3} {:>7.2} {:>4} {:>7}",
            r.algorithm.to_string(),
            m.total_time,
            m.mean_turnaround,
            m.mean_waiting,
            m.throughput,
            m.idle_percent,
            m.context_switches,
            m.deadlines_missed
        );
    }
    out
}
