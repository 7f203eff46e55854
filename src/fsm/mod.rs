//! Hierarchical state machine: a fixed tree of named states, one active
//! root-to-leaf path, minimal-diff transitions between branches.

mod behavior;
mod builder;
mod diag;
mod machine;

pub use behavior::{ActorCtx, Behavior};
pub use builder::{BuildError, MachineBuilder};
pub use diag::{CollectDiagnostics, Diagnostics, LogDiagnostics, MachineFault};
pub use machine::{StateId, StateMachine};
