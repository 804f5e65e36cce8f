//! Frame-aligned scheduling primitives.
//!
//! Everything here is single-threaded: the host calls in from its frame
//! loop. [`TwoPhaseScheduler`] guarantees that a phase-2 task never runs
//! before the phase-1 work queued ahead of it has been painted.
//! [`FrameCoalescer`] collapses bursts of requests into one run per frame.

use std::collections::VecDeque;

type Task<S> = Box<dyn FnOnce(&mut S)>;

/// Two-phase task queue over a host context `S`.
///
/// Frame loop contract:
/// 1. [`frame_painted`](Self::frame_painted) once the previous frame is on screen
/// 2. [`run_pending`](Self::run_pending) before building the new frame
pub struct TwoPhaseScheduler<S> {
    phase1: VecDeque<(u64, Task<S>)>,
    /// Phase-2 tasks with the last phase-1 sequence number they wait for
    phase2: VecDeque<(u64, Task<S>)>,
    next_seq: u64,
    /// Highest phase-1 sequence number that has run
    ran_upto: u64,
    /// Highest phase-1 sequence number that has run and been painted
    painted_upto: u64,
}

impl<S> Default for TwoPhaseScheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TwoPhaseScheduler<S> {
    pub fn new() -> Self {
        Self {
            phase1: VecDeque::new(),
            phase2: VecDeque::new(),
            next_seq: 1,
            ran_upto: 0,
            painted_upto: 0,
        }
    }

    /// Queues a phase-1 task for the next [`run_pending`](Self::run_pending).
    pub fn schedule(&mut self, task: impl FnOnce(&mut S) + 'static) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.phase1.push_back((seq, Box::new(task)));
    }

    /// Queues a phase-2 task.
    ///
    /// It runs on the first paint that follows the execution of every
    /// phase-1 task scheduled before it.
    pub fn schedule_after_paint(&mut self, task: impl FnOnce(&mut S) + 'static) {
        let barrier = self.next_seq - 1;
        self.phase2.push_back((barrier, Box::new(task)));
    }

    /// Runs all queued phase-1 tasks.
    ///
    /// Tasks scheduled while running wait for the next call.
    pub fn run_pending(&mut self, ctx: &mut S) -> usize {
        let batch: Vec<(u64, Task<S>)> = self.phase1.drain(..).collect();
        let count = batch.len();
        for (seq, task) in batch {
            task(ctx);
            self.ran_upto = self.ran_upto.max(seq);
        }
        count
    }

    /// Signals that a frame has been painted and runs eligible phase-2 tasks.
    ///
    /// Phase-1 work that ran before this call is now on screen.
    pub fn frame_painted(&mut self, ctx: &mut S) -> usize {
        self.painted_upto = self.ran_upto;
        let mut count = 0;
        let mut waiting = VecDeque::new();
        while let Some((barrier, task)) = self.phase2.pop_front() {
            if barrier <= self.painted_upto {
                task(ctx);
                count += 1;
            } else {
                waiting.push_back((barrier, task));
            }
        }
        self.phase2 = waiting;
        count
    }

    /// True when any task is queued.
    pub fn has_pending(&self) -> bool {
        !self.phase1.is_empty() || !self.phase2.is_empty()
    }
}

/// Last-write-wins request slot, drained once per frame.
///
/// Only the owner holds `&mut`, so there is exactly one writer.
#[derive(Debug)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    cancelled: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            cancelled: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending request; the superseded one never runs.
    pub fn request(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.cancelled += 1;
        }
    }

    /// Runs `f` on the latest request, if any.
    pub fn on_frame<U>(&mut self, f: impl FnOnce(T) -> U) -> Option<U> {
        self.pending.take().map(f)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of requests superseded before they ran.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}
