//! Fault reporting for the state machine.
//!
//! The machine never panics on a bad request and never logs directly;
//! it hands every fault to an injected [`Diagnostics`] sink. Production
//! wires [`LogDiagnostics`], tests wire [`CollectDiagnostics`] and assert
//! on what was captured.

use std::fmt;
use std::sync::Mutex;

/// A recoverable fault the machine detected and refused to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineFault {
    /// A transition named a state that is not in the tree.
    UnknownState {
        requested: String,
        known: Vec<String>,
    },
    /// An operation ran before `start`.
    NotStarted { operation: &'static str },
    /// `start` was called on a machine that is already running.
    AlreadyStarted,
    /// A parent or default-substate walk exceeded the node count.
    /// Only reachable if the tree storage has been corrupted.
    WalkOverflow { from: String },
}

impl fmt::Display for MachineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownState { requested, known } => {
                write!(
                    f,
                    "unknown state \"{requested}\" (known: {})",
                    known.join(", ")
                )
            }
            Self::NotStarted { operation } => {
                write!(f, "{operation} called before start")
            }
            Self::AlreadyStarted => write!(f, "start called on a running machine"),
            Self::WalkOverflow { from } => {
                write!(f, "tree walk from \"{from}\" exceeded the node count")
            }
        }
    }
}

/// Where machine faults go. Implementations must tolerate being called
/// from any state hook.
pub trait Diagnostics: Send + Sync {
    fn report(&self, fault: MachineFault);
}

/// Forwards faults to the `log` facade at warn level.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, fault: MachineFault) {
        log::warn!("state machine: {fault}");
    }
}

/// Captures faults for later inspection.
#[derive(Default)]
pub struct CollectDiagnostics {
    faults: Mutex<Vec<MachineFault>>,
}

impl CollectDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything captured so far.
    pub fn take(&self) -> Vec<MachineFault> {
        std::mem::take(&mut self.faults.lock().expect("fault log poisoned"))
    }

    pub fn is_empty(&self) -> bool {
        self.faults.lock().expect("fault log poisoned").is_empty()
    }
}

impl Diagnostics for CollectDiagnostics {
    fn report(&self, fault: MachineFault) {
        self.faults.lock().expect("fault log poisoned").push(fault);
    }
}
