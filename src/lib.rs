//! Hierarchical locomotion control for game actors.
//!
//! A fixed tree of states (look, grounded movement, airborne movement)
//! drives each actor through one active root-to-leaf path. Transitions
//! rewrite only the part of the path that changes, so ancestor states keep
//! their working state while leaves swap underneath them. Input sources,
//! bodies, and animation targets sit behind traits, which is what lets a
//! scripted player, a waypoint bot, and a test probe share every line of
//! the control code.

pub mod actor;
pub mod ai;
pub mod camera;
pub mod controller;
pub mod engine;
pub mod fsm;
pub mod states;
pub mod systems;

pub use controller::Controller;
pub use fsm::{ActorCtx, Behavior, BuildError, MachineBuilder, StateId, StateMachine};
