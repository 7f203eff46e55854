//! Hierarchical state machine over a fixed state tree.
//!
//! States live in an arena (`Vec<Node>`) built once by
//! [`MachineBuilder`](super::MachineBuilder); the tree never changes shape
//! after that. What changes is the **active path**: the chain of live
//! states from the root down to one leaf. Ticks sweep that path parent to
//! leaf, and transitions rewrite only the suffix that actually differs,
//! so shared ancestors keep their internal state across leaf swaps.
//!
//! Transition rules:
//! - The exited branch runs `exit` leaf-first up to (not including) the
//!   deepest ancestor shared with the target; the entered branch runs
//!   `enter` from below that ancestor down to the new leaf.
//! - A target with a default substate is extended along the default chain,
//!   so the path always ends at a leaf of that chain.
//! - A transition that resolves to the current path runs no hooks and
//!   fires no notification.
//! - The path is swapped only after every hook has returned; observers
//!   never see a half-applied transition.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::behavior::{ActorCtx, Behavior};
use super::diag::{Diagnostics, MachineFault};

/// Index of a state in the machine's arena. Stable for the machine's
/// lifetime; obtained from [`StateMachine::id_of`] or the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) children: Vec<StateId>,
    pub(crate) default_substate: Option<StateId>,
    pub(crate) depth: usize,
    pub(crate) behavior: Box<dyn Behavior>,
}

type ChangeListener = Box<dyn FnMut(&str) + Send + Sync>;

#[derive(Clone, Copy)]
enum Hook {
    Update,
    Physics,
}

impl Hook {
    fn operation(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Physics => "physics_update",
        }
    }
}

pub struct StateMachine {
    nodes: Vec<Node>,
    by_name: HashMap<String, StateId>,
    root: StateId,
    active_path: Vec<StateId>,
    listeners: Vec<ChangeListener>,
    diag: Arc<dyn Diagnostics>,
    started: bool,
}

impl StateMachine {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        by_name: HashMap<String, StateId>,
        diag: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            nodes,
            by_name,
            root: StateId(0),
            active_path: Vec::new(),
            listeners: Vec::new(),
            diag,
            started: false,
        }
    }

    // -----------------------------------------------------------------------
    // Tree queries
    // -----------------------------------------------------------------------

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: StateId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn depth_of(&self, id: StateId) -> usize {
        self.nodes[id.0].depth
    }

    pub fn parent_of(&self, id: StateId) -> Option<StateId> {
        self.nodes[id.0].parent
    }

    pub fn children_of(&self, id: StateId) -> &[StateId] {
        &self.nodes[id.0].children
    }

    pub fn default_substate_of(&self, id: StateId) -> Option<StateId> {
        self.nodes[id.0].default_substate
    }

    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    // -----------------------------------------------------------------------
    // Active-path queries
    // -----------------------------------------------------------------------

    /// Root-to-leaf chain of live states. Empty until [`start`] runs.
    ///
    /// [`start`]: StateMachine::start
    pub fn active_path(&self) -> &[StateId] {
        &self.active_path
    }

    /// The live state at hierarchy level `level` (root is level 0).
    pub fn state_at_level(&self, level: usize) -> Option<StateId> {
        self.active_path.get(level).copied()
    }

    pub fn leaf(&self) -> Option<StateId> {
        self.active_path.last().copied()
    }

    pub fn leaf_name(&self) -> Option<&str> {
        self.leaf().map(|id| self.name_of(id))
    }

    /// Whether `name` is anywhere on the active path, leaf or ancestor.
    pub fn is_active(&self, name: &str) -> bool {
        self.id_of(name).is_some_and(|id| self.active_path.contains(&id))
    }

    pub fn is_active_id(&self, id: StateId) -> bool {
        self.active_path.contains(&id)
    }

    // -----------------------------------------------------------------------
    // Change notification
    // -----------------------------------------------------------------------

    /// Register a listener called with the new leaf name after every applied
    /// transition, including the initial descent in [`start`].
    ///
    /// [`start`]: StateMachine::start
    pub fn on_change(&mut self, listener: impl FnMut(&str) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify_change(&mut self) {
        let Some(leaf) = self.active_path.last() else {
            return;
        };
        let leaf = self.nodes[leaf.0].name.clone();
        for listener in &mut self.listeners {
            listener(&leaf);
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Run every state's `ready` hook (parents before children), then enter
    /// the root and descend its default-substate chain to a leaf.
    pub fn start(&mut self, ctx: &mut ActorCtx) {
        if self.started {
            self.diag.report(MachineFault::AlreadyStarted);
            return;
        }
        self.started = true;

        // Arena order is parent-before-child by construction.
        for node in &mut self.nodes {
            node.behavior.ready(ctx);
        }

        let Some(path) = self.default_chain_from(self.root) else {
            return;
        };
        for &id in &path {
            self.nodes[id.0].behavior.enter(ctx);
        }
        self.active_path = path;
        self.notify_change();
    }

    /// Transition to the state named `target`. Unknown names are reported
    /// to the diagnostics sink and leave the active path untouched.
    pub fn change_state(&mut self, target: &str, ctx: &mut ActorCtx) {
        match self.id_of(target) {
            Some(id) => self.change_state_to(id, ctx),
            None => {
                self.diag.report(MachineFault::UnknownState {
                    requested: target.to_owned(),
                    known: self.known_names(),
                });
            }
        }
    }

    /// Transition to `target`, entering and exiting only the states outside
    /// the path prefix shared between the current and target branches.
    pub fn change_state_to(&mut self, target: StateId, ctx: &mut ActorCtx) {
        if !self.started {
            self.diag.report(MachineFault::NotStarted {
                operation: "change_state",
            });
            return;
        }
        if target.0 >= self.nodes.len() {
            self.diag.report(MachineFault::UnknownState {
                requested: format!("id {}", target.0),
                known: self.known_names(),
            });
            return;
        }

        let Some(mut target_path) = self.path_from_root(target) else {
            return;
        };
        // Targets with default substates resolve to the end of their chain,
        // so the path always terminates at a leaf of that chain.
        let Some(chain) = self.default_chain_from(target) else {
            return;
        };
        target_path.extend(chain.into_iter().skip(1));

        if target_path == self.active_path {
            return;
        }

        let prefix = common_prefix_len(&self.active_path, &target_path);

        // Exit the abandoned branch leaf-first, stopping at the boundary.
        for i in (prefix..self.active_path.len()).rev() {
            let id = self.active_path[i];
            self.nodes[id.0].behavior.exit(ctx);
        }
        // Enter the new branch from the boundary down to the leaf.
        for i in prefix..target_path.len() {
            let id = target_path[i];
            self.nodes[id.0].behavior.enter(ctx);
        }

        self.active_path = target_path;
        self.notify_change();
    }

    /// Per-frame sweep: `update` on every active state, root to leaf.
    /// A transition requested by a hook via
    /// [`ActorCtx::request_transition`] is applied after the sweep.
    pub fn update(&mut self, ctx: &mut ActorCtx) {
        self.sweep(Hook::Update, ctx);
    }

    /// Fixed-step sweep: `physics_update` on every active state, root to leaf.
    pub fn physics_update(&mut self, ctx: &mut ActorCtx) {
        self.sweep(Hook::Physics, ctx);
    }

    fn sweep(&mut self, hook: Hook, ctx: &mut ActorCtx) {
        if !self.started {
            self.diag.report(MachineFault::NotStarted {
                operation: hook.operation(),
            });
            return;
        }

        for i in 0..self.active_path.len() {
            let id = self.active_path[i];
            let behavior = &mut self.nodes[id.0].behavior;
            match hook {
                Hook::Update => behavior.update(ctx),
                Hook::Physics => behavior.physics_update(ctx),
            }
        }

        // Deferred so no hook ever observes a mid-sweep path rewrite.
        if let Some(target) = ctx.take_request() {
            self.change_state(&target, ctx);
        }
    }

    // -----------------------------------------------------------------------
    // Path construction
    // -----------------------------------------------------------------------

    /// Root-to-`target` chain via parent links. `None` only if the walk
    /// overruns the node count, which means corrupted storage.
    fn path_from_root(&self, target: StateId) -> Option<Vec<StateId>> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.nodes[current.0].parent {
            if path.len() > self.nodes.len() {
                self.diag.report(MachineFault::WalkOverflow {
                    from: self.nodes[target.0].name.clone(),
                });
                return None;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// `start` and every following state on its default-substate chain.
    fn default_chain_from(&self, start: StateId) -> Option<Vec<StateId>> {
        let mut chain = vec![start];
        let mut current = start;
        while let Some(next) = self.nodes[current.0].default_substate {
            if chain.len() > self.nodes.len() {
                self.diag.report(MachineFault::WalkOverflow {
                    from: self.nodes[start.0].name.clone(),
                });
                return None;
            }
            chain.push(next);
            current = next;
        }
        Some(chain)
    }

    fn known_names(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name.clone()).collect()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self
            .active_path
            .iter()
            .map(|&id| self.nodes[id.0].name.as_str())
            .collect();
        f.debug_struct("StateMachine")
            .field("states", &self.nodes.len())
            .field("active_path", &path)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

fn common_prefix_len(a: &[StateId], b: &[StateId]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
