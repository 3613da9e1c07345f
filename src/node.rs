//! The node state machine.
//!
//! Every node runs the same cycle on [`Node::tick`]:
//!
//! ```raw
//! PENDING -> configure() -> ACTIVE <-> run() -> CANCEL -> cancel()
//!                                        |                  |
//!                                        -> SUCCESS/FAIL ------> cleanup() -> PENDING
//! ```
//!
//! What a node does in each step is supplied by a [`Task`] (leaf logic, a
//! decorator or a branch policy) and/or by closures registered on the node.

use crate::{
    blackboard::{Blackboard, NodeId},
    error::{Error, Result},
    node_data::NodeData,
    status::{NodeStatus, StatusCode},
};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use tracing::{debug, info, trace};

/// How a node relates to its children, which decides how configure, cleanup and
/// cancel propagate down the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    /// Exactly one child whose lifecycle is nested in the decorator's.
    Decorator,
    /// An ordered list of children combined by a policy.
    Behavior,
}

impl NodeKind {
    pub fn max_children(self) -> NumChildren {
        match self {
            Self::Leaf => NumChildren::Finite(0),
            Self::Decorator => NumChildren::Finite(1),
            Self::Behavior => NumChildren::Infinite,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NumChildren {
    Finite(usize),
    Infinite,
}

impl PartialOrd for NumChildren {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(match (self, other) {
            (NumChildren::Finite(_), NumChildren::Infinite) => std::cmp::Ordering::Less,
            (NumChildren::Infinite, NumChildren::Finite(_)) => std::cmp::Ordering::Greater,
            (NumChildren::Finite(lhs), NumChildren::Finite(rhs)) => lhs.cmp(rhs),
            (NumChildren::Infinite, NumChildren::Infinite) => return None,
        })
    }
}

/// The hooks a node calls during its lifecycle.
///
/// Only `run` is mandatory. `kind` tells the node how many children the task
/// expects and how to propagate lifecycle calls to them.
pub trait Task: Send {
    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn configure(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus>;

    fn cleanup(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    fn cancel(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }
}

pub type RunCallback = Box<dyn FnMut(&NodeData) -> Result<NodeStatus> + Send>;
pub type Callback = Box<dyn FnMut(&NodeData) -> Result<()> + Send>;

#[derive(Default)]
struct Callbacks {
    run: Option<RunCallback>,
    configure: Option<Callback>,
    cleanup: Option<Callback>,
    cancel: Option<Callback>,
}

/// What a [`Task`] sees of its node: the scoped memory and the children.
pub struct Context<'a> {
    name: &'a str,
    data: &'a NodeData,
    children: &'a mut Vec<Node>,
    open_nodes: &'a mut Vec<NodeId>,
}

impl<'a> Context<'a> {
    /// Name of the node running the task.
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn data(&self) -> &NodeData {
        self.data
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_name(&self, index: usize) -> &str {
        self.children
            .get(index)
            .map_or("", |child| child.name.as_str())
    }

    /// Ticks the child at `index` and keeps the open set in sync with it.
    ///
    /// A child that reports ACTIVE is opened; a child that went back to PENDING
    /// (it finished and cleaned up) is closed. Ticking a missing child returns a
    /// fresh PENDING status.
    pub fn tick_child(&mut self, index: usize) -> Result<NodeStatus> {
        let Some(child) = self.children.get_mut(index) else {
            return Ok(NodeStatus::default());
        };
        trace!(node = self.name, child = %child.name, "tick_child");
        let result = child.tick()?;
        if result == StatusCode::Active && !self.open_nodes.contains(&child.id) {
            info!(node = self.name, child = %child.name, "adding child to open_nodes");
            self.open_nodes.push(child.id);
        }
        if child.result == StatusCode::Pending {
            if let Some(pos) = self.open_nodes.iter().position(|id| *id == child.id) {
                info!(node = self.name, child = %child.name, "removing child from open_nodes");
                self.open_nodes.remove(pos);
            }
        }
        Ok(result)
    }

    /// Publishes a fresh PENDING status for every child.
    pub fn reset_children_status(&mut self) {
        for child in self.children.iter() {
            child
                .blackboard
                .set_node_status(child.id, NodeStatus::default());
        }
    }

    /// Marks every child as open, so that it is evaluated on the next run.
    pub fn open_all_children(&mut self) {
        *self.open_nodes = self.children.iter().map(|child| child.id).collect();
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.children
            .get(index)
            .map_or(false, |child| self.open_nodes.contains(&child.id))
    }

    pub fn open_nodes(&self) -> &[NodeId] {
        self.open_nodes
    }
}

/// A node of a behavior tree.
///
/// A node owns its children and a handle to the [`Blackboard`] holding its
/// memory and published status. By default a node gets a private blackboard;
/// pass the same blackboard to several nodes to let them share data.
pub struct Node {
    id: NodeId,
    name: String,
    blackboard: Blackboard,
    kind: NodeKind,
    task: Option<Box<dyn Task>>,
    callbacks: Callbacks,
    children: Vec<Node>,
    open_nodes: Vec<NodeId>,
    result: NodeStatus,
    force_state: Option<NodeStatus>,
}

impl Node {
    /// A leaf without any hooks. Register at least a run callback before ticking.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            blackboard: Blackboard::new(),
            kind: NodeKind::Leaf,
            task: None,
            callbacks: Callbacks::default(),
            children: vec![],
            open_nodes: vec![],
            result: NodeStatus::default(),
            force_state: None,
        }
    }

    pub fn with_task(name: impl Into<String>, task: impl Task + 'static) -> Self {
        Self::with_boxed_task(name, Box::new(task))
    }

    pub fn with_boxed_task(name: impl Into<String>, task: Box<dyn Task>) -> Self {
        let mut ret = Self::new(name);
        ret.kind = task.kind();
        ret.task = Some(task);
        ret
    }

    pub fn with_blackboard(mut self, blackboard: &Blackboard) -> Self {
        self.blackboard = blackboard.clone();
        self
    }

    pub fn with_child(mut self, child: Node) -> Result<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn set_blackboard(&mut self, blackboard: &Blackboard) {
        self.blackboard = blackboard.clone();
    }

    /// The in-memory result of the state machine.
    pub fn result(&self) -> &NodeStatus {
        &self.result
    }

    /// The last status this node published to its blackboard.
    pub fn status(&self) -> NodeStatus {
        self.blackboard.get_node_status(self.id)
    }

    pub fn nodedata(&self) -> Arc<NodeData> {
        self.blackboard.get_memory(self.id)
    }

    pub fn set_nodedata<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.blackboard.save(key, value, Some(self.id))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Ids of the children that are currently mid-execution.
    pub fn open_nodes(&self) -> &[NodeId] {
        &self.open_nodes
    }

    pub fn register_run_cb(
        &mut self,
        cb: impl FnMut(&NodeData) -> Result<NodeStatus> + Send + 'static,
    ) {
        self.callbacks.run = Some(Box::new(cb));
    }

    pub fn register_configure_cb(&mut self, cb: impl FnMut(&NodeData) -> Result<()> + Send + 'static) {
        self.callbacks.configure = Some(Box::new(cb));
    }

    pub fn register_cleanup_cb(&mut self, cb: impl FnMut(&NodeData) -> Result<()> + Send + 'static) {
        self.callbacks.cleanup = Some(Box::new(cb));
    }

    pub fn register_cancel_cb(&mut self, cb: impl FnMut(&NodeData) -> Result<()> + Send + 'static) {
        self.callbacks.cancel = Some(Box::new(cb));
    }

    fn check_child(&self, child: &Node) -> Result<()> {
        if NumChildren::Finite(self.children.len()) >= self.kind.max_children() {
            return Err(Error::TooManyChildren {
                parent: self.name.clone(),
            });
        }
        if self.children.iter().any(|c| c.name == child.name) {
            return Err(Error::DuplicateChild {
                parent: self.name.clone(),
                child: child.name.clone(),
            });
        }
        Ok(())
    }

    /// Appends a child. Names must be unique among the children of one node.
    pub fn add_child(&mut self, child: Node) -> Result<()> {
        self.check_child(&child)?;
        self.children.push(child);
        Ok(())
    }

    pub fn prepend_child(&mut self, child: Node) -> Result<()> {
        self.insert_child(child, 0)
    }

    /// Inserts a child at `index`, or at the end if `index` is past it.
    pub fn insert_child(&mut self, child: Node, index: usize) -> Result<()> {
        self.check_child(&child)?;
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        Ok(())
    }

    /// Replaces the child of a decorator. Other kinds of nodes append.
    pub fn set_child(&mut self, child: Node) -> Result<()> {
        if self.kind == NodeKind::Decorator {
            self.children.clear();
            self.open_nodes.clear();
        }
        self.add_child(child)
    }

    pub fn remove_child(&mut self, name: &str) -> Result<Node> {
        let pos = self
            .children
            .iter()
            .position(|child| child.name == name)
            .ok_or_else(|| Error::ChildNotFound {
                parent: self.name.clone(),
                child: name.to_owned(),
            })?;
        let child = self.children.remove(pos);
        self.open_nodes.retain(|id| *id != child.id);
        Ok(child)
    }

    /// Forces the outcome of the next runs until the node completes.
    pub fn force(&mut self, code: StatusCode) {
        debug!(node = %self.name, force_state = ?self.force_state, "force");
        self.force_state = Some(NodeStatus::new(
            code,
            format!("Forcing {} to {}", self.name, code),
        ));
    }

    /// Cancels this node and every running node below it.
    ///
    /// The node reports CANCEL until the next [`Node::tick`], which cleans it up.
    pub fn cancel(&mut self) -> Result<()> {
        self.cancel_node()
    }

    /// Advances the state machine by one step and returns the run result.
    pub fn tick(&mut self) -> Result<NodeStatus> {
        trace!(node = %self.name, result = %self.result, "tick");
        if self.result == StatusCode::Pending {
            self.configure()?;
        }
        let result = self.run()?;
        if self.result.code.is_terminal() {
            self.cleanup()?;
        }
        Ok(result)
    }

    fn call_task<R>(
        &mut self,
        data: &NodeData,
        f: impl FnOnce(&mut dyn Task, &mut Context<'_>) -> Result<R>,
    ) -> Option<Result<R>> {
        let task = self.task.as_deref_mut()?;
        let mut ctx = Context {
            name: &self.name,
            data,
            children: &mut self.children,
            open_nodes: &mut self.open_nodes,
        };
        Some(f(task, &mut ctx))
    }

    fn configure(&mut self) -> Result<()> {
        debug!(node = %self.name, result = %self.result, "configure");
        if self.kind == NodeKind::Decorator {
            if let Some(child) = self.children.first_mut() {
                child.configure()?;
            }
        }
        let data = self.blackboard.get_memory(self.id);
        self.call_task(&data, |task, ctx| task.configure(ctx))
            .transpose()?;
        if let Some(cb) = self.callbacks.configure.as_mut() {
            cb(&*data)?;
        }
        self.result = NodeStatus::active(format!("Configured {}", self.name));
        Ok(())
    }

    fn run(&mut self) -> Result<NodeStatus> {
        let result = if let Some(forced) = &self.force_state {
            forced.clone()
        } else if let Some(cb) = self.callbacks.run.as_mut() {
            cb(&*self.blackboard.get_memory(self.id))?
        } else {
            let data = self.blackboard.get_memory(self.id);
            match self.call_task(&data, |task, ctx| task.run(ctx)) {
                Some(result) => result?,
                None => {
                    return Err(Error::Unimplemented {
                        node: self.name.clone(),
                    })
                }
            }
        };
        trace!(node = %self.name, %result, "set node status");
        self.result = result.clone();
        self.blackboard.set_node_status(self.id, result.clone());
        Ok(result)
    }

    fn cleanup(&mut self) -> Result<()> {
        debug!(node = %self.name, result = %self.result, "cleanup");
        match self.kind {
            NodeKind::Decorator => {
                if let Some(child) = self.children.first_mut() {
                    child.cleanup()?;
                }
            }
            NodeKind::Behavior => {
                self.cancel_children()?;
                self.cleanup_children()?;
                self.open_nodes.clear();
            }
            NodeKind::Leaf => (),
        }
        if self.result == StatusCode::Active {
            self.cancel_node()?;
        }
        let data = self.blackboard.get_memory(self.id);
        self.call_task(&data, |task, ctx| task.cleanup(ctx))
            .transpose()?;
        if let Some(cb) = self.callbacks.cleanup.as_mut() {
            cb(&*data)?;
        }
        self.force_state = None;
        self.result = NodeStatus::new(StatusCode::Pending, format!("Cleaned up {}", self.name));
        Ok(())
    }

    fn cancel_node(&mut self) -> Result<()> {
        debug!(node = %self.name, result = %self.result, "cancel");
        match self.kind {
            NodeKind::Decorator => {
                if let Some(child) = self.children.first_mut() {
                    child.cancel_node()?;
                }
            }
            NodeKind::Behavior => self.cancel_children()?,
            NodeKind::Leaf => (),
        }
        self.force_state = Some(NodeStatus::cancel(format!("Canceling {}", self.name)));
        let data = self.blackboard.get_memory(self.id);
        self.call_task(&data, |task, ctx| task.cancel(ctx))
            .transpose()?;
        if let Some(cb) = self.callbacks.cancel.as_mut() {
            cb(&*data)?;
        }
        self.run()?;
        Ok(())
    }

    /// Cancels every child still in flight. Children that already report CANCEL
    /// only wait for their cleanup.
    fn cancel_children(&mut self) -> Result<()> {
        for child in self.children.iter_mut() {
            if !matches!(child.result.code, StatusCode::Pending | StatusCode::Cancel) {
                info!(node = %self.name, child = %child.name, "canceling child");
                child.cancel_node()?;
            }
        }
        Ok(())
    }

    fn cleanup_children(&mut self) -> Result<()> {
        for child in self.children.iter_mut() {
            if child.result != StatusCode::Pending {
                info!(node = %self.name, child = %child.name, "cleaning up child");
                child.cleanup()?;
                self.open_nodes.retain(|id| *id != child.id);
            }
        }
        Ok(())
    }
}

impl Debug for Node {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_struct("Node")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("result", &self.result)
            .field("children", &self.children)
            .finish()
    }
}
