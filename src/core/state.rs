use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::scheduler::{Rank, ReadyQueue};

pub type Ticks = u64;
// Position in the original input; the last tie-break of every policy
pub type Seq = usize;

new_key_type! {
    pub struct ProcKey;
}

/// One entry of the input workload, as handed over by the acquisition layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: String,
    #[serde(alias = "chegada")]
    pub arrival: Ticks,
    #[serde(alias = "execucao")]
    pub burst: Ticks,
    pub deadline: Ticks,
    #[serde(alias = "prioridade", default)]
    pub priority: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Ready,
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: String,
    pub seq: Seq,
    pub state: ProcState,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub deadline: Ticks,
    pub priority: i64,
    pub remaining: Ticks,
    pub vruntime: f64,
    // One entry per dispatch
    pub starts: Vec<Ticks>,
    pub finish: Option<Ticks>,
}

impl Process {
    pub fn turnaround(&self) -> Option<Ticks> {
        self.finish.map(|finish| finish - self.arrival)
    }

    pub fn waiting(&self) -> Option<Ticks> {
        self.turnaround().map(|turnaround| turnaround - self.burst)
    }

    pub fn met_deadline(&self) -> bool {
        self.finish.is_some_and(|finish| finish <= self.deadline)
    }

    // Trailing digits of the id ("P12" -> 12), falling back to the input position.
    pub fn display_number(&self) -> u64 {
        display_number(&self.id, self.seq)
    }
}

pub fn display_number(id: &str, seq: Seq) -> u64 {
    let digits = id.len() - id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    id[id.len() - digits..].parse().unwrap_or(seq as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Idle,
    Running(ProcKey),
    // Paying context-switch overhead; nobody owns the CPU
    Switching,
}

#[derive(Debug)]
pub struct SimState {
    pub clock: Ticks,
    pub cpu: CpuState,
    pub procs: SlotMap<ProcKey, Process>,
    pub ready: ReadyQueue,
    pub idle_time: Ticks,
    pub context_switches: u64,
    queued: FxHashSet<ProcKey>,
}

impl SimState {
    pub fn new(ready: ReadyQueue, capacity: usize) -> Self {
        Self {
            clock: 0,
            cpu: CpuState::Idle,
            procs: SlotMap::with_capacity_and_key(capacity),
            ready,
            idle_time: 0,
            context_switches: 0,
            queued: FxHashSet::default(),
        }
    }

    pub fn create_process(&mut self, spec: &ProcessSpec, seq: Seq, vruntime: f64) -> ProcKey {
        self.procs.insert(Process {
            id: spec.id.clone(),
            seq,
            state: ProcState::Ready,
            arrival: spec.arrival,
            burst: spec.burst,
            deadline: spec.deadline,
            priority: spec.priority,
            remaining: spec.burst,
            vruntime,
            starts: Vec::new(),
            finish: None,
        })
    }

    pub fn proc(&self, key: ProcKey) -> &Process {
        self.procs.get(key).expect("Unknown process key")
    }

    pub fn proc_mut(&mut self, key: ProcKey) -> &mut Process {
        self.procs.get_mut(key).expect("Unknown process key")
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.cpu == CpuState::Idle
    }

    pub fn running(&self) -> Option<ProcKey> {
        match self.cpu {
            CpuState::Running(key) => Some(key),
            _ => None,
        }
    }

    pub fn advance_to(&mut self, time: Ticks) {
        debug_assert!(time >= self.clock, "Clock cannot move backwards");
        self.clock = time;
    }

    pub fn enqueue(&mut self, key: ProcKey, rank: Option<Rank>) {
        assert!(
            self.queued.insert(key),
            "Process {} already present in the ready queue",
            self.proc(key).id
        );

        let proc = self.proc_mut(key);
        debug_assert!(
            proc.state != ProcState::Finished,
            "Finished process {} cannot be enqueued",
            proc.id
        );
        proc.state = ProcState::Ready;

        self.ready.push(key, rank);
    }

    pub fn dequeue(&mut self) -> Option<ProcKey> {
        let key = self.ready.pop()?;
        let removed = self.queued.remove(&key);
        debug_assert!(removed, "Process popped from ready queue missing membership");
        Some(key)
    }

    pub fn is_queued(&self, key: ProcKey) -> bool {
        self.queued.contains(&key)
    }

    pub fn set_running(&mut self, key: ProcKey) {
        debug_assert!(
            !self.queued.contains(&key),
            "Running process must not be enqueued"
        );
        debug_assert!(self.cpu_is_idle(), "CPU already busy");

        self.cpu = CpuState::Running(key);
        let clock = self.clock;
        let proc = self.proc_mut(key);
        proc.state = ProcState::Running;
        proc.starts.push(clock);
    }

    pub fn mark_finished(&mut self, key: ProcKey) {
        let clock = self.clock;
        let proc = self.proc_mut(key);
        debug_assert_eq!(
            proc.state,
            ProcState::Running,
            "Process {} must have been running before it finished",
            proc.id
        );
        debug_assert_eq!(proc.remaining, 0, "Process {} finished early", proc.id);
        debug_assert!(proc.finish.is_none(), "Process {} finished twice", proc.id);

        proc.state = ProcState::Finished;
        proc.finish = Some(clock);
    }

    pub fn clear_cpu(&mut self) {
        self.cpu = CpuState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_number_uses_trailing_digits() {
        assert_eq!(display_number("P12", 0), 12);
        assert_eq!(display_number("job-7", 3), 7);
        assert_eq!(display_number("idle", 4), 4);
        assert_eq!(display_number("", 2), 2);
    }

    #[test]
    fn derived_metrics_need_a_finish() {
        let mut proc = Process {
            id: "P1".into(),
            seq: 0,
            state: ProcState::Running,
            arrival: 2,
            burst: 3,
            deadline: 6,
            priority: 1,
            remaining: 0,
            vruntime: 0.0,
            starts: vec![2],
            finish: None,
        };
        assert_eq!(proc.turnaround(), None);
        assert!(!proc.met_deadline());

        proc.finish = Some(7);
        assert_eq!(proc.turnaround(), Some(5));
        assert_eq!(proc.waiting(), Some(2));
        assert!(!proc.met_deadline());
    }
}
