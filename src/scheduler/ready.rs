use std::collections::VecDeque;

use keyed_priority_queue::KeyedPriorityQueue;

use super::Rank;
use crate::core::ProcKey;

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo {
        procs: VecDeque<ProcKey>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcKey, Rank>,
    },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn push(&mut self, key: ProcKey, rank: Option<Rank>) {
        match self {
            Self::Fifo { procs } => procs.push_back(key),
            Self::Priq { procs } => {
                let rank = rank.expect("Attempted to push to a Priq with no rank");
                let prev = procs.push(key, rank);
                debug_assert!(prev.is_none(), "Process pushed twice into a Priq");
            }
        }
    }

    pub fn pop(&mut self) -> Option<ProcKey> {
        match self {
            Self::Fifo { procs } => procs.pop_front(),
            Self::Priq { procs } => procs.pop().map(|(key, _)| key),
        }
    }

    pub fn contains(&self, key: ProcKey) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&key),
            Self::Priq { procs } => procs.get_priority(&key).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<ProcKey> {
        match self {
            Self::Fifo { procs } => procs.iter().copied().collect(),
            Self::Priq { procs } => procs.iter().map(|(key, _)| *key).collect(),
        }
    }
}
