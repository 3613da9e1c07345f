//! Scoped memory shared between nodes.
//!
//! A [`Blackboard`] keeps one [`NodeData`] per node scope plus an unscoped base
//! memory, and the last status each node published. Cloning a `Blackboard` yields
//! another handle to the same store, which is how a subtree shares data.

use crate::{
    error::{Error, Result},
    node_data::{NodeData, Value},
    status::NodeStatus,
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};
use tracing::trace;
use uuid::Uuid;

/// Identity of a node, used as its scope in a [`Blackboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, fmt)
    }
}

/// Source of a remapped key: `(scope, key)` it is pulled from.
type Remapping = HashMap<String, (NodeId, String)>;

#[derive(Default)]
struct NodeMemory {
    node_data: Arc<NodeData>,
    remapping: RwLock<Remapping>,
}

#[derive(Default)]
struct Inner {
    base_memory: Arc<NodeData>,
    node_memory: RwLock<HashMap<NodeId, Arc<NodeMemory>>>,
    node_status: RwLock<HashMap<NodeId, NodeStatus>>,
}

#[derive(Clone, Default)]
pub struct Blackboard {
    inner: Arc<Inner>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn node_memory(&self, scope: NodeId) -> Arc<NodeMemory> {
        if let Some(memory) = self.inner.node_memory.read().get(&scope) {
            return memory.clone();
        }
        self.inner
            .node_memory
            .write()
            .entry(scope)
            .or_default()
            .clone()
    }

    /// Returns the memory of `scope` after pulling every remapped key from its
    /// source. A missing source leaves the local value untouched.
    pub fn get_memory(&self, scope: NodeId) -> Arc<NodeData> {
        self.materialize(scope, &mut vec![])
    }

    fn materialize(&self, scope: NodeId, visiting: &mut Vec<NodeId>) -> Arc<NodeData> {
        let memory = self.node_memory(scope);
        if visiting.contains(&scope) {
            return memory.node_data.clone();
        }
        visiting.push(scope);

        let remapping: Vec<_> = memory
            .remapping
            .read()
            .iter()
            .map(|(key, (from_scope, from_key))| (key.clone(), *from_scope, from_key.clone()))
            .collect();
        for (key, from_scope, from_key) in remapping {
            match self.materialize(from_scope, visiting).get_any(&from_key) {
                Some(value) => memory.node_data.set_any(key, value),
                None => trace!(%scope, %from_scope, from_key, "remap source not set yet"),
            }
        }

        visiting.pop();
        memory.node_data.clone()
    }

    pub fn base_memory(&self) -> Arc<NodeData> {
        self.inner.base_memory.clone()
    }

    fn memory(&self, scope: Option<NodeId>) -> Arc<NodeData> {
        match scope {
            Some(scope) => self.get_memory(scope),
            None => self.base_memory(),
        }
    }

    /// Saves a value into the memory of `scope`, or into the base memory when
    /// `scope` is `None`.
    pub fn save<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
        scope: Option<NodeId>,
    ) {
        self.memory(scope).set(key, value)
    }

    pub fn get<T: Clone + 'static>(&self, key: &str, scope: Option<NodeId>) -> Result<T> {
        self.memory(scope).get(key)
    }

    pub fn get_any(&self, key: &str, scope: Option<NodeId>) -> Result<Value> {
        self.memory(scope)
            .get_any(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))
    }

    /// Makes `to_scope.to_key` follow `from_scope.from_key`. The value is pulled
    /// each time the memory of `to_scope` is materialized.
    pub fn add_remapping(
        &self,
        from_scope: NodeId,
        from_key: impl Into<String>,
        to_scope: NodeId,
        to_key: impl Into<String>,
    ) -> Result<()> {
        let to_key = to_key.into();
        let memory = self.node_memory(to_scope);
        let mut remapping = memory.remapping.write();
        if remapping.contains_key(&to_key) {
            return Err(Error::RemapConflict { key: to_key });
        }
        remapping.insert(to_key, (from_scope, from_key.into()));
        Ok(())
    }

    /// Snapshot of every published status.
    pub fn get_status(&self) -> HashMap<NodeId, NodeStatus> {
        self.inner.node_status.read().clone()
    }

    pub fn get_node_status(&self, scope: NodeId) -> NodeStatus {
        if let Some(status) = self.inner.node_status.read().get(&scope) {
            return status.clone();
        }
        self.inner
            .node_status
            .write()
            .entry(scope)
            .or_default()
            .clone()
    }

    pub fn set_node_status(&self, scope: NodeId, status: NodeStatus) {
        self.inner.node_status.write().insert(scope, status);
    }

    /// Forgets all published statuses. Mostly useful for display purposes.
    pub fn clear_node_status(&self) {
        self.inner.node_status.write().clear();
    }
}

impl Debug for Blackboard {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_struct("Blackboard")
            .field("base_memory", &self.inner.base_memory)
            .field("scopes", &self.inner.node_memory.read().len())
            .field("node_status", &self.inner.node_status.read().len())
            .finish()
    }
}
