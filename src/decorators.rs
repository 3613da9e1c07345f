//! Single-child nodes that rewrite the status of their child.
//!
//! Every decorator ticks its child once per run. Statuses the decorator does not
//! care about are passed through unchanged.

use crate::{
    error::Result,
    node::{Context, NodeKind, Task},
    status::{NodeStatus, StatusCode},
};
use tracing::debug;

/// Turns SUCCESS into FAIL and FAIL into SUCCESS.
#[derive(Debug, Default, Clone, Copy)]
pub struct Negate;

impl Task for Negate {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "Negate::run");
        let result = ctx.tick_child(0)?;
        Ok(match result.code {
            StatusCode::Success => NodeStatus::fail(format!("Negating {}", ctx.child_name(0))),
            StatusCode::Fail => NodeStatus::success(format!("Negating {}", ctx.child_name(0))),
            _ => result,
        })
    }
}

/// Keeps running forever, restarting the child whenever it completes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Repeat;

impl Task for Repeat {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "Repeat::run");
        let result = ctx.tick_child(0)?;
        Ok(match result.code {
            StatusCode::Success | StatusCode::Fail => {
                NodeStatus::active(format!("Repeating.. {}", ctx.child_name(0)))
            }
            _ => result,
        })
    }
}

/// Stays ACTIVE as long as the child succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct While;

impl Task for While {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "While::run");
        let result = ctx.tick_child(0)?;
        if result == StatusCode::Success {
            return Ok(NodeStatus::active(format!(
                "Continuing.. {}",
                ctx.child_name(0)
            )));
        }
        Ok(result)
    }
}

/// Stays ACTIVE as long as the child fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Until;

impl Task for Until {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "Until::run");
        let result = ctx.tick_child(0)?;
        if result == StatusCode::Fail {
            return Ok(NodeStatus::active(format!(
                "Trying again.. {}",
                ctx.child_name(0)
            )));
        }
        Ok(result)
    }
}

/// Like [`Until`], but gives up after `max_count` failures.
///
/// The counter lives in the node memory under `count` and the limit under
/// `max_count`. A `max_count` already present in memory (set through the
/// blackboard or a tree definition) wins over the constructor value.
#[derive(Debug, Clone, Copy)]
pub struct UntilCount {
    max_count: i64,
}

impl UntilCount {
    pub fn new(max_count: i64) -> Self {
        Self { max_count }
    }
}

impl Default for UntilCount {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Task for UntilCount {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        let data = ctx.data();
        data.set("count", 0i64);
        data.get_data("max_count", self.max_count)?;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "UntilCount::run");
        let result = ctx.tick_child(0)?;
        if result == StatusCode::Fail {
            let data = ctx.data();
            let count = data.update("count", |count: &mut i64| {
                *count += 1;
                *count
            })?;
            let max_count: i64 = data.get("max_count")?;
            if count < max_count {
                return Ok(NodeStatus::active(format!(
                    "Trying again {count} until {max_count}.."
                )));
            }
        }
        Ok(result)
    }
}

/// Reports FAIL when the child succeeds, so completion always means FAIL.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fail;

impl Task for Fail {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "Fail::run");
        let result = ctx.tick_child(0)?;
        if result == StatusCode::Success {
            return Ok(NodeStatus::fail(format!("Failing {}", ctx.child_name(0))));
        }
        Ok(result)
    }
}

/// Reports SUCCESS when the child fails, so completion always means SUCCESS.
#[derive(Debug, Default, Clone, Copy)]
pub struct Succeed;

impl Task for Succeed {
    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), child = ctx.child_name(0), "Succeed::run");
        let result = ctx.tick_child(0)?;
        if result == StatusCode::Fail {
            return Ok(NodeStatus::success(format!(
                "Succeeding {}",
                ctx.child_name(0)
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test;
