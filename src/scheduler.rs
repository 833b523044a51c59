//! Cooperative timer-polling scheduler.
//!
//! A single-threaded engine that tracks a next-due deadline per task slot
//! and invokes a [`TaskDelegate`] whenever a slot comes due. There is no
//! preemption: every task body runs to completion before the next is
//! dispatched, so bodies must stay short — the per-frame render task in
//! particular has to finish well inside one frame period.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Scheduler                                           │
//! │  ┌────────┬──────────────────────┬──────────────┐    │
//! │  │ slot   │ cadence              │ next_due_ms  │    │
//! │  ├────────┼──────────────────────┼──────────────┤    │
//! │  │ render │ PerFrame { 25 Hz }   │ rolling      │    │
//! │  │ scenes │ Every { 1000 ms }    │ rolling      │    │
//! │  │ telem  │ Every { 5000 ms }    │ rolling      │    │
//! │  │ halt   │ OnceAfter { 240 s }  │ fires once   │    │
//! │  └────────┴──────────────────────┴──────────────┘    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Termination is a plain value, not an error: a task returns
//! [`TaskOutcome::Halt`] and `tick` hands it straight back to the run loop.
//! Anything a task cannot handle locally is fatal to the whole process —
//! there is no retry tier.

use log::info;

/// Maximum number of task slots (stack-allocated).
const MAX_TASKS: usize = 4;

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// How often a task runs.
#[derive(Debug, Clone, Copy)]
pub enum Cadence {
    /// Run `hz` times per second — the per-frame rendering cadence.
    /// Deadlines are tracked in whole milliseconds, so `hz` must divide
    /// 1000 evenly for the effective rate to match
    /// (`SystemConfig::validate` enforces this for the render task).
    PerFrame { hz: u32 },
    /// Run every fixed period.
    Every { period_ms: u32 },
    /// Run once after a fixed delay from scheduler start, then never again.
    OnceAfter { delay_ms: u32 },
}

impl Cadence {
    /// Milliseconds between runs; `None` for one-shot cadences.
    fn period_ms(self) -> Option<u64> {
        match self {
            Self::PerFrame { hz } => Some(u64::from(1000 / hz.max(1))),
            Self::Every { period_ms } => Some(u64::from(period_ms)),
            Self::OnceAfter { .. } => None,
        }
    }

    /// First deadline relative to scheduler start.
    fn first_due_ms(self) -> u64 {
        match self {
            // Rendering starts at frame 0 immediately.
            Self::PerFrame { .. } => 0,
            Self::Every { period_ms } => u64::from(period_ms),
            Self::OnceAfter { delay_ms } => u64::from(delay_ms),
        }
    }
}

/// What a task body tells the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Keep running.
    Continue,
    /// Unwind the run loop cleanly. Not an error.
    Halt,
}

/// Callback the scheduler invokes for each due slot.
///
/// Decoupling the engine from the task bodies keeps it independently
/// testable: the run loop implements this by matching on the slot index.
pub trait TaskDelegate {
    fn run_task(&mut self, slot: usize, label: &'static str) -> TaskOutcome;
}

// ═══════════════════════════════════════════════════════════════
//  Engine
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct TaskEntry {
    label: &'static str,
    cadence: Cadence,
    next_due_ms: u64,
    fired: bool,
}

/// The cooperative scheduler engine.
pub struct Scheduler {
    slots: [Option<TaskEntry>; MAX_TASKS],
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
        }
    }

    /// Register a task. Returns the slot index, or `None` if full.
    pub fn add(&mut self, label: &'static str, cadence: Cadence) -> Option<usize> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!("scheduler: added '{}' at slot {} ({:?})", label, i, cadence);
                *slot = Some(TaskEntry {
                    label,
                    cadence,
                    next_due_ms: cadence.first_due_ms(),
                    fired: false,
                });
                return Some(i);
            }
        }
        None
    }

    /// Dispatch every due task, in slot order, at the given elapsed time.
    ///
    /// Each body runs to completion before the next is considered. If a
    /// body returns [`TaskOutcome::Halt`] the remaining slots are skipped
    /// and `Halt` is returned immediately.
    ///
    /// Periodic deadlines advance by whole periods; after a stall the
    /// backlog is skipped rather than replayed, so a long task never causes
    /// a catch-up burst.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut impl TaskDelegate) -> TaskOutcome {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot else { continue };
            if entry.fired || now_ms < entry.next_due_ms {
                continue;
            }

            let outcome = delegate.run_task(i, entry.label);

            match entry.cadence.period_ms() {
                Some(period) => {
                    entry.next_due_ms += period;
                    if entry.next_due_ms <= now_ms {
                        // Fell behind by a full period or more; re-anchor.
                        entry.next_due_ms = now_ms + period;
                    }
                }
                None => entry.fired = true,
            }

            if outcome == TaskOutcome::Halt {
                info!("scheduler: '{}' raised halt", entry.label);
                return TaskOutcome::Halt;
            }
        }
        TaskOutcome::Continue
    }

    /// Earliest pending deadline, for the run loop's sleep. `None` once
    /// every slot is a spent one-shot.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.slots
            .iter()
            .flatten()
            .filter(|e| !e.fired)
            .map(|e| e.next_due_ms)
            .min()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
