use super::{
    event::EventQueue,
    state::{CpuState, ProcState, SimState, Ticks},
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_clock: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, state: &SimState, events: &EventQueue) {
        self.step += 1;

        debug_assert!(
            state.clock >= self.last_clock,
            "Clock moved backwards from {} to {}",
            self.last_clock,
            state.clock
        );
        self.last_clock = state.clock;

        if let Some(next) = events.peek_min_time() {
            debug_assert!(
                next >= state.clock,
                "Pending event at t={next} is behind the clock t={}",
                state.clock
            );
        }

        match state.cpu {
            CpuState::Running(key) => {
                let proc = state.proc(key);
                debug_assert_eq!(
                    proc.state,
                    ProcState::Running,
                    "CPU owner {} must be Running",
                    proc.id
                );
                debug_assert!(
                    !state.is_queued(key),
                    "Running process {} must not appear in the ready queue",
                    proc.id
                );
            }
            CpuState::Idle => debug_assert!(
                state.ready.is_empty(),
                "CPU left idle with {} ready processes",
                state.ready.len()
            ),
            CpuState::Switching => {}
        }

        for key in state.ready.keys() {
            let proc = state.proc(key);
            debug_assert_eq!(
                proc.state,
                ProcState::Ready,
                "Queued process {} must be Ready",
                proc.id
            );
            debug_assert!(proc.remaining > 0, "Queued process {} has no work", proc.id);
        }

        for proc in state.procs.values() {
            if proc.state == ProcState::Finished {
                debug_assert_eq!(proc.remaining, 0, "Finished process {} has work", proc.id);
                debug_assert!(proc.finish.is_some(), "Finished process {} lacks a finish", proc.id);
            }
            debug_assert!(proc.remaining <= proc.burst, "Process {} gained work", proc.id);
        }
    }
}
