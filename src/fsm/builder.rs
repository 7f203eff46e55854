//! Declarative construction of a state tree.
//!
//! Trees are described as a root plus `child` / `default_child` calls and
//! validated in one pass by [`MachineBuilder::build`]. Parents must be
//! declared before their children, which is also what makes the finished
//! arena parent-before-child ordered.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::behavior::Behavior;
use super::diag::{Diagnostics, LogDiagnostics};
use super::machine::{Node, StateId, StateMachine};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("duplicate state name \"{0}\"")]
    DuplicateName(String),
    #[error("parent \"{parent}\" of \"{child}\" is not defined yet")]
    UnknownParent { parent: String, child: String },
    #[error("\"{parent}\" already has default substate \"{existing}\"")]
    DuplicateDefault { parent: String, existing: String },
}

struct StateDef {
    name: String,
    parent: Option<String>,
    default_of_parent: bool,
    behavior: Box<dyn Behavior>,
}

/// Builder for a [`StateMachine`]. Order of calls is the order states are
/// readied in, so declare parents before children and siblings in the order
/// their `ready` hooks should run.
pub struct MachineBuilder {
    defs: Vec<StateDef>,
    diag: Arc<dyn Diagnostics>,
}

impl MachineBuilder {
    /// Begin a tree at its root state.
    pub fn new(root_name: impl Into<String>, root: impl Behavior + 'static) -> Self {
        Self {
            defs: vec![StateDef {
                name: root_name.into(),
                parent: None,
                default_of_parent: false,
                behavior: Box::new(root),
            }],
            diag: Arc::new(LogDiagnostics),
        }
    }

    /// Replace the fault sink the finished machine reports into.
    pub fn diagnostics(mut self, diag: Arc<dyn Diagnostics>) -> Self {
        self.diag = diag;
        self
    }

    /// Add `name` as a child of `parent`.
    pub fn child(
        self,
        parent: &str,
        name: impl Into<String>,
        behavior: impl Behavior + 'static,
    ) -> Self {
        self.add(parent, name, false, behavior)
    }

    /// Add `name` as a child of `parent` and make it the substate entered
    /// when a transition stops at `parent`.
    pub fn default_child(
        self,
        parent: &str,
        name: impl Into<String>,
        behavior: impl Behavior + 'static,
    ) -> Self {
        self.add(parent, name, true, behavior)
    }

    fn add(
        mut self,
        parent: &str,
        name: impl Into<String>,
        default_of_parent: bool,
        behavior: impl Behavior + 'static,
    ) -> Self {
        self.defs.push(StateDef {
            name: name.into(),
            parent: Some(parent.to_owned()),
            default_of_parent,
            behavior: Box::new(behavior),
        });
        self
    }

    /// Validate the described tree and assemble the machine.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let mut nodes: Vec<Node> = Vec::with_capacity(self.defs.len());
        let mut by_name: HashMap<String, StateId> = HashMap::with_capacity(self.defs.len());

        for def in self.defs {
            if by_name.contains_key(&def.name) {
                return Err(BuildError::DuplicateName(def.name));
            }

            let (parent_id, depth) = match &def.parent {
                None => (None, 0),
                Some(parent) => {
                    let parent_id = by_name.get(parent).copied().ok_or_else(|| {
                        BuildError::UnknownParent {
                            parent: parent.clone(),
                            child: def.name.clone(),
                        }
                    })?;
                    (Some(parent_id), nodes[parent_id.0].depth + 1)
                }
            };

            let id = StateId(nodes.len());
            if let Some(parent_id) = parent_id {
                if def.default_of_parent {
                    if let Some(existing) = nodes[parent_id.0].default_substate {
                        return Err(BuildError::DuplicateDefault {
                            parent: nodes[parent_id.0].name.clone(),
                            existing: nodes[existing.0].name.clone(),
                        });
                    }
                    nodes[parent_id.0].default_substate = Some(id);
                }
                nodes[parent_id.0].children.push(id);
            }

            by_name.insert(def.name.clone(), id);
            nodes.push(Node {
                name: def.name,
                parent: parent_id,
                children: Vec::new(),
                default_substate: None,
                depth,
                behavior: def.behavior,
            });
        }

        Ok(StateMachine::from_parts(nodes, by_name, self.diag))
    }
}
