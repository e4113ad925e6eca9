use std::collections::VecDeque;

use super::state::{ProcKey, Seq, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // Carries the input position; the process record is created on dispatch
    Arrival(Seq),
    BurstComplete(ProcKey),
    QuantumExpired(ProcKey),
    OverheadComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: Ticks,
    pub kind: EventKind,
}

/// Pending events sorted by time. Events sharing a timestamp keep their
/// insertion order, which makes every run with the same input identical.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, time: Ticks, kind: EventKind) {
        // `<=` places the new event behind everything already queued at `time`
        let at = self.events.partition_point(|event| event.time <= time);
        self.events.insert(at, Event { time, kind });
    }

    pub fn peek_min_time(&self) -> Option<Ticks> {
        self.events.front().map(|event| event.time)
    }

    pub fn pop_all_at(&mut self, time: Ticks) -> Vec<Event> {
        let count = self
            .events
            .iter()
            .take_while(|event| event.time == time)
            .count();
        self.events.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
