//! The command gate: an admission barrier that forms same-kind cohorts.
//!
//! ```text
//! admit(kind) ──► [ matching runs, gate lock released ] ──► depart(outcome)
//!                                                              │
//!                                   last to leave ─────────────┴──► merge(cohort)
//! ```
//!
//! Callers of one [`CommandKind`] are admitted together; a caller of a
//! different kind waits until every in-flight command has departed. The
//! departing thread that brings the in-flight count to zero runs the merge
//! while still holding the gate lock, so no new cohort is admitted until the
//! merge has completed.
//!
//! A steady stream of one kind keeps its cohort open indefinitely and can
//! starve the other kinds. The gate makes no fairness promise beyond this.

use std::collections::VecDeque;

use cohort_types::{CommandKind, WakePolicy};
use parking_lot::{Condvar, Mutex};

use crate::RestingOrder;
use crate::matcher::{CommandOutcome, CommandResult};

/// Everything a cohort produced, handed to the merge in one piece.
#[derive(Debug)]
pub struct Cohort {
    pub kind: CommandKind,
    /// Per-command results in departure order.
    pub results: Vec<CommandResult>,
    /// Orders created by this cohort, awaiting insertion.
    pub pending: VecDeque<RestingOrder>,
}

impl Cohort {
    fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            results: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Proof of admission, consumed by [`CommandGate::depart`].
#[derive(Debug)]
#[must_use = "an admitted command must depart, or the gate never drains"]
pub struct AdmissionPass {
    kind: CommandKind,
}

impl AdmissionPass {
    pub fn kind(&self) -> CommandKind {
        self.kind
    }
}

#[derive(Debug)]
struct GateState {
    current: CommandKind,
    in_flight: usize,
    cohort: Cohort,
    cohorts_merged: u64,
}

/// Serialises concurrent callers into same-kind cohorts.
#[derive(Debug)]
pub struct CommandGate {
    state: Mutex<GateState>,
    changed: Condvar,
    wake_policy: WakePolicy,
}

impl CommandGate {
    #[must_use]
    pub fn new(wake_policy: WakePolicy) -> Self {
        Self {
            state: Mutex::new(GateState {
                current: CommandKind::Buy,
                in_flight: 0,
                cohort: Cohort::new(CommandKind::Buy),
                cohorts_merged: 0,
            }),
            changed: Condvar::new(),
            wake_policy,
        }
    }

    /// Block until a command of `kind` may run.
    ///
    /// Returns immediately when the gate is idle or already running `kind`.
    /// On admission every waiter is woken, so other callers of the same
    /// kind join the cohort while mismatched kinds go back to waiting.
    pub fn admit(&self, kind: CommandKind) -> AdmissionPass {
        let mut state = self.state.lock();
        while state.in_flight > 0 && state.current != kind {
            self.changed.wait(&mut state);
        }
        if state.in_flight == 0 {
            if state.current != kind {
                tracing::debug!(from = %state.current, to = %kind, "Cohort kind switched");
            }
            state.cohort.kind = kind;
        }
        state.in_flight += 1;
        state.current = kind;
        drop(state);

        self.changed.notify_all();
        AdmissionPass { kind }
    }

    /// Record a finished command. The caller that drains the cohort runs
    /// `merge` under the gate lock before anyone else is admitted.
    ///
    /// Returns `true` if this call ran the merge.
    pub fn depart<F>(&self, pass: AdmissionPass, outcome: CommandOutcome, merge: F) -> bool
    where
        F: FnOnce(Cohort),
    {
        let mut state = self.state.lock();
        debug_assert_eq!(state.current, pass.kind);
        debug_assert!(state.in_flight > 0);

        state.in_flight -= 1;
        let CommandOutcome { result, new_order } = outcome;
        if let Some(order) = new_order {
            state.cohort.pending.push_back(order);
        }
        state.cohort.results.push(result);

        let drained = state.in_flight == 0;
        if drained {
            let kind = state.current;
            let cohort = std::mem::replace(&mut state.cohort, Cohort::new(kind));
            merge(cohort);
            state.cohorts_merged += 1;
        }
        drop(state);

        match self.wake_policy {
            WakePolicy::All => {
                self.changed.notify_all();
            }
            WakePolicy::One => {
                self.changed.notify_one();
            }
        }
        drained
    }

    /// Kind of the current (or most recent) cohort.
    #[must_use]
    pub fn current_kind(&self) -> CommandKind {
        self.state.lock().current
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    #[must_use]
    pub fn cohorts_merged(&self) -> u64 {
        self.state.lock().cohorts_merged
    }

    #[must_use]
    pub fn wake_policy(&self) -> WakePolicy {
        self.wake_policy
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new(WakePolicy::default())
    }
}
