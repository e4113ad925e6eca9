use log::{debug, info, trace, warn};
use serde::Serialize;

use super::{
    event::{Event, EventKind, EventQueue},
    observer::Observer,
    state::{CpuState, ProcKey, Process, ProcessSpec, Seq, SimState, Ticks},
    trace::{Subject, Timeline},
};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    // An arrival outranked the running process but the CPU was not taken away
    PreemptionSkipped {
        time: Ticks,
        candidate: String,
        running: String,
    },
}

/// Everything a finished run leaves behind.
#[derive(Debug)]
pub struct Outcome {
    pub policy: Policy,
    pub final_time: Ticks,
    pub idle_time: Ticks,
    pub context_switches: u64,
    pub timeline: Timeline,
    // In input order
    pub processes: Vec<Process>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Engine {
    pub state: SimState,
    policy: Policy,
    overhead: Ticks,
    events: EventQueue,
    workload: Vec<ProcessSpec>,
    timeline: Timeline,
    diagnostics: Vec<Diagnostic>,
    observer: Observer,
}

impl Engine {
    pub fn new(policy: Policy, overhead: Ticks, workload: Vec<ProcessSpec>) -> Self {
        assert!(!workload.is_empty(), "Simulation requires at least one process");

        // Seeding in input order makes equal arrivals pop in input order
        let mut events = EventQueue::new();
        for (seq, spec) in workload.iter().enumerate() {
            events.insert(spec.arrival, EventKind::Arrival(seq));
        }

        Self {
            state: SimState::new(policy.ready_queue(), workload.len()),
            policy,
            overhead,
            events,
            workload,
            timeline: Timeline::new(),
            diagnostics: Vec::new(),
            observer: Observer::new(),
        }
    }

    pub fn now(&self) -> Ticks {
        self.state.clock
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn observed_steps(&self) -> u64 {
        self.observer.steps()
    }

    pub fn is_done(&self) -> bool {
        self.events.is_empty() && self.state.ready.is_empty()
    }

    pub fn run(mut self) -> Outcome {
        info!(
            "Starting {} simulation with {} processes",
            self.policy.algorithm(),
            self.workload.len()
        );

        while !self.is_done() {
            self.step();
        }

        info!(
            "Simulation finished at t={} ({} context switches, {} idle)",
            self.state.clock, self.state.context_switches, self.state.idle_time
        );
        self.into_outcome()
    }

    /// One outer iteration: advance the clock to the next event, dispatch
    /// every event due at that instant, then hand an idle CPU to the policy.
    pub fn step(&mut self) {
        let Some(next) = self.events.peek_min_time() else {
            // Nothing pending; an idle CPU with ready work still needs a dispatch
            self.allocate();
            self.observer.observe(&self.state, &self.events);
            return;
        };

        let clock = self.state.clock;
        if next > clock {
            if self.state.cpu_is_idle() {
                self.timeline.record_idle(clock, next);
                self.state.idle_time += next - clock;
            }
            self.state.advance_to(next);
        }

        loop {
            let due = self.events.pop_all_at(self.state.clock);
            if due.is_empty() {
                break;
            }
            for event in due {
                self.dispatch_event(event);
            }
        }

        self.allocate();
        self.observer.observe(&self.state, &self.events);
    }

    fn dispatch_event(&mut self, event: Event) {
        debug!("[t={}] {:?}", self.state.clock, event.kind);
        match event.kind {
            EventKind::Arrival(seq) => self.handle_arrival(seq),
            EventKind::BurstComplete(key) => self.handle_burst_complete(key),
            EventKind::QuantumExpired(key) => self.handle_quantum_expired(key),
            EventKind::OverheadComplete => self.state.clear_cpu(),
        }
    }

    fn handle_arrival(&mut self, seq: Seq) {
        let vruntime = self.policy.initial_vruntime(self.state.clock, seq);
        let key = self
            .state
            .create_process(&self.workload[seq], seq, vruntime);
        self.enqueue(key);

        if let Some(running) = self.state.running() {
            let candidate = self.state.proc(key);
            let current = self.state.proc(running);
            if self.policy.would_preempt(candidate, current) {
                warn!(
                    "[t={}] {} should preempt {} under {}; preemption is not performed",
                    self.state.clock,
                    candidate.id,
                    current.id,
                    self.policy.algorithm()
                );
                self.diagnostics.push(Diagnostic::PreemptionSkipped {
                    time: self.state.clock,
                    candidate: candidate.id.clone(),
                    running: current.id.clone(),
                });
            }
        }
    }

    // Completion frees the CPU without charging a context switch.
    fn handle_burst_complete(&mut self, key: ProcKey) {
        self.close_span(key);
        self.state.mark_finished(key);
        self.state.clear_cpu();
    }

    fn handle_quantum_expired(&mut self, key: ProcKey) {
        self.close_span(key);
        self.enqueue(key);
        self.state.clear_cpu();
        self.begin_context_switch(key);
    }

    // Overhead is charged to the row of the process that was interrupted.
    fn begin_context_switch(&mut self, interrupted: ProcKey) {
        if self.state.ready.is_empty() || self.overhead == 0 {
            // CPU stays idle; the next allocation happens directly
            return;
        }

        let clock = self.state.clock;
        let end = clock.saturating_add(self.overhead);
        let subject = Subject::Process(self.state.proc(interrupted).id.clone());

        self.state.context_switches += 1;
        self.state.cpu = CpuState::Switching;
        self.timeline.record_overhead(subject, clock, end);
        self.events.insert(end, EventKind::OverheadComplete);
    }

    fn close_span(&mut self, key: ProcKey) {
        let clock = self.state.clock;
        debug_assert_eq!(
            self.state.running(),
            Some(key),
            "Closing a span for a process that is not on the CPU"
        );

        let proc = self.state.proc(key);
        let start = *proc
            .starts
            .last()
            .expect("Running process has no recorded start");
        self.timeline
            .record_execution(&proc.id, start, clock, proc.deadline);
    }

    fn enqueue(&mut self, key: ProcKey) {
        let rank = self.policy.rank(self.state.proc(key));
        trace!("enqueue {} rank={:?}", self.state.proc(key).id, rank);
        self.state.enqueue(key, rank);
    }

    fn allocate(&mut self) {
        if !self.state.cpu_is_idle() {
            return;
        }
        let Some(key) = self.state.dequeue() else {
            return;
        };

        self.state.set_running(key);
        let clock = self.state.clock;
        let policy = self.policy;
        let proc = self.state.proc_mut(key);
        let slice = policy.slice(proc);
        debug!(
            "[t={}] dispatch {} for {} (remaining {})",
            clock, proc.id, slice.len, proc.remaining
        );

        let kind = if slice.expires {
            EventKind::QuantumExpired(key)
        } else {
            EventKind::BurstComplete(key)
        };
        self.events.insert(clock.saturating_add(slice.len), kind);
    }

    fn into_outcome(self) -> Outcome {
        let mut processes: Vec<Process> = self.state.procs.into_iter().map(|(_, p)| p).collect();
        processes.sort_by_key(|p| p.seq);

        Outcome {
            policy: self.policy,
            final_time: self.state.clock,
            idle_time: self.state.idle_time,
            context_switches: self.state.context_switches,
            timeline: self.timeline,
            processes,
            diagnostics: self.diagnostics,
        }
    }
}
