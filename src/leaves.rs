use crate::{
    error::Result,
    node::{Context, Task},
    status::NodeStatus,
};

/// Always returns SUCCESS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuccessNode;

impl Task for SuccessNode {
    fn run(&mut self, _ctx: &mut Context) -> Result<NodeStatus> {
        Ok(NodeStatus::success(""))
    }
}

/// Always returns FAIL.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailNode;

impl Task for FailNode {
    fn run(&mut self, _ctx: &mut Context) -> Result<NodeStatus> {
        Ok(NodeStatus::fail(""))
    }
}

/// Always returns ACTIVE, so it only finishes when canceled or forced.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContinueNode;

impl Task for ContinueNode {
    fn run(&mut self, _ctx: &mut Context) -> Result<NodeStatus> {
        Ok(NodeStatus::active(""))
    }
}
