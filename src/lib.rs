//! # task-behavior-engine (Rust crate)
//!
//! A tick-driven behavior tree engine with scoped blackboard memory.
//!
//!
//! ## Overview
//!
//! A behavior tree is a tree of nodes that the application advances one step at
//! a time by calling [`Node::tick`] on the root, usually on a fixed period.
//! Every tick returns a [`NodeStatus`]: ACTIVE means "tick me again", SUCCESS
//! and FAIL mean the node finished, and CANCEL means it was aborted.
//!
//! Each node goes through the same cycle:
//!
//! ```raw
//! PENDING -> configure -> ACTIVE <-> run -> SUCCESS / FAIL / CANCEL -> cleanup -> PENDING
//! ```
//!
//! so a finished tree can simply be ticked again to start over.
//!
//! Nodes come in three kinds:
//!
//! * leaves, which carry the application logic,
//! * [decorators], which wrap exactly one child and transform its result,
//! * [branches], which combine an ordered list of children with a policy such
//!   as [`Sequencer`](branches::Sequencer) or [`Selector`](branches::Selector).
//!
//!
//! ## How it looks like
//!
//! The logic of a leaf is a [`Task`]. Only `run` is required; `configure` runs
//! when the node starts and `cleanup` when it finishes.
//!
//! ```rust
//! use task_behavior_engine::{Context, NodeStatus, Result, Task};
//!
//! struct Count;
//!
//! impl Task for Count {
//!     fn configure(&mut self, ctx: &mut Context) -> Result<()> {
//!         let start = ctx.data().get_data("start", 0i64)?;
//!         ctx.data().set("index", start);
//!         Ok(())
//!     }
//!
//!     fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
//!         let limit = ctx.data().get_data("limit", 5i64)?;
//!         let index = ctx.data().update("index", |index: &mut i64| {
//!             *index += 1;
//!             *index
//!         })?;
//!         if index < limit {
//!             Ok(NodeStatus::active(format!("Count: {index}")))
//!         } else {
//!             Ok(NodeStatus::success(format!("Reached {limit}")))
//!         }
//!     }
//! }
//! ```
//!
//! Then build a tree out of nodes. Nodes that share a [`Blackboard`] can see
//! each other's memory.
//!
//! ```rust
//! # use task_behavior_engine::*;
//! # struct Count;
//! # impl Task for Count { fn run(&mut self, _: &mut Context) -> Result<NodeStatus> { Ok(NodeStatus::success("")) } }
//! use task_behavior_engine::branches::Sequencer;
//!
//! let bb = Blackboard::new();
//! let count_1 = Node::with_task("count_1", Count).with_blackboard(&bb);
//! count_1.set_nodedata("limit", 1i64);
//! let count_2 = Node::with_task("count_2", Count).with_blackboard(&bb);
//! count_2.set_nodedata("limit", 2i64);
//!
//! let mut root = Node::with_task("finish_counts", Sequencer)
//!     .with_blackboard(&bb)
//!     .with_child(count_1)?
//!     .with_child(count_2)?;
//! # Ok::<(), Error>(())
//! ```
//!
//! and call `tick()` until the tree finishes.
//!
//! ```rust
//! # use task_behavior_engine::*;
//! # let mut root = Node::with_task("root", leaves::SuccessNode);
//! loop {
//!     let status = root.tick()?;
//!     println!("{status}");
//!     if status.code.is_terminal() {
//!         break;
//!     }
//! }
//! # Ok::<(), Error>(())
//! ```
//!
//! A node can also be driven by closures instead of a task, which is handy for
//! one-off leaves and tests. A run closure takes precedence over the task's run
//! hook; the other closures run after the task hook of the same name.
//!
//! ```rust
//! # use task_behavior_engine::*;
//! let mut node = Node::new("hello");
//! node.register_run_cb(|_| Ok(NodeStatus::success("hello")));
//! assert_eq!(node.tick()?, StatusCode::Success);
//! # Ok::<(), Error>(())
//! ```
//!
//!
//! ## Canceling and forcing
//!
//! [`Node::cancel`] aborts a node and every running node below it. The node
//! reports CANCEL until its next tick cleans it up.
//! [`Node::force`] overrides the result of a node until it completes, which is
//! useful to steer a tree by hand.
//!
//!
//! ## Blackboard
//!
//! A [`Blackboard`] holds one [`NodeData`] per node plus an unscoped base
//! memory, and the last status each node published. A key of one node can
//! follow a key of another with [`Blackboard::add_remapping`]: the value is
//! pulled every time the memory of the destination is read.
//!
//! ```rust
//! # use task_behavior_engine::*;
//! let bb = Blackboard::new();
//! let source = Node::new("source").with_blackboard(&bb);
//! let dest = Node::new("dest").with_blackboard(&bb);
//! bb.add_remapping(source.id(), "limit", dest.id(), "start")?;
//!
//! source.set_nodedata("limit", 3i64);
//! assert_eq!(dest.nodedata().get::<i64>("start")?, 3);
//! # Ok::<(), Error>(())
//! ```
//!
//! Handles are cheap to clone and can be shared between threads, so several
//! trees on one blackboard can be ticked concurrently.
//!
//!
//! ## Loading trees from text
//!
//! Trees can be described in a small text format and instantiated with a
//! [`Registry`] that maps type names to task constructors.
//!
//! ```raw
//! # The counting example
//! tree main = Sequencer finish_counts {
//!     Count count_1 (limit = 1)
//!     Count count_2 (limit = 2, start <- count_1.limit)
//! }
//! ```
//!
//! * A node is written as its type name, an optional node name (the type name
//!   is used otherwise), optional parameters in parentheses and optional
//!   children in braces.
//! * `key = literal` writes an integer, float, `true`/`false` or a double
//!   quoted string into the memory of the node.
//! * `key <- node.key` makes the key follow a key of another node of the tree.
//! * `#` starts a line comment.
//!
//! ```rust
//! # use task_behavior_engine::*;
//! # struct Count;
//! # impl Task for Count { fn run(&mut self, _: &mut Context) -> Result<NodeStatus> { Ok(NodeStatus::success("")) } }
//! let source = r#"
//! tree main = Sequencer finish_counts {
//!     Count count_1 (limit = 1)
//!     Count count_2 (limit = 2, start <- count_1.limit)
//! }
//! "#;
//!
//! let mut registry = Registry::default();
//! registry.register("Count", boxify(|| Count));
//!
//! let tree_source = parse_source(source)?;
//! let mut root = load(tree_source.main()?, &registry, &Blackboard::new())?;
//! assert_eq!(root.children().len(), 2);
//! # Ok::<(), error::LoadError>(())
//! ```
//!
//! The same trees can be written in YAML under a `behavior_tree` key and
//! loaded with [`load_yaml`].
//!
//! ```yaml
//! behavior_tree:
//!   main:
//!     type: Sequencer
//!     name: finish_counts
//!     children:
//!       - type: Count
//!         name: count_1
//!         data:
//!           limit: 1
//!       - type: Count
//!         name: count_2
//!         data:
//!           limit: 2
//!         remap:
//!           start: count_1.limit
//! ```
//!
//!
//! ## Logging
//!
//! The engine emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! lifecycle transitions, `trace` for every run, and `info` when a child opens
//! or closes. Install any subscriber to see them, e.g. `tracing-subscriber`
//! with `RUST_LOG=task_behavior_engine=debug`.

mod blackboard;
pub mod branches;
pub mod decorators;
pub mod error;
pub mod leaves;
mod node;
mod node_data;
pub mod parser;
mod registry;
mod status;

pub use crate::blackboard::{Blackboard, NodeId};
pub use crate::error::{Error, LoadError, Result};
pub use crate::node::{Callback, Context, Node, NodeKind, NumChildren, RunCallback, Task};
pub use crate::node_data::{NodeData, Value};
pub use crate::parser::{load, load_yaml, parse_file, parse_source, parse_yaml};
pub use crate::registry::{boxify, Constructor, Registry};
pub use crate::status::{NodeStatus, StatusCode};
