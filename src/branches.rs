//! Composite policies over an ordered list of children.
//!
//! The bookkeeping shared by all of them (the open set, cancel and cleanup of
//! children) lives in [`Node`](crate::Node) and [`Context`]; a policy only
//! decides which children to tick and how to combine their results.

use crate::{
    error::Result,
    node::{Context, NodeKind, Task},
    status::{NodeStatus, StatusCode},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

/// Runs children in order until one succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct Selector;

impl Task for Selector {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "Selector::run");
        ctx.reset_children_status();
        for i in 0..ctx.num_children() {
            let result = ctx.tick_child(i)?;
            match result.code {
                StatusCode::Active | StatusCode::Pending => {
                    return Ok(NodeStatus::active(format!(
                        "Executing {}:{}",
                        ctx.name(),
                        ctx.child_name(i)
                    )))
                }
                StatusCode::Success => {
                    return Ok(NodeStatus::success(format!(
                        "Successfully completed {}:{}",
                        ctx.name(),
                        ctx.child_name(i)
                    )))
                }
                _ => (),
            }
        }
        Ok(NodeStatus::fail(format!(
            "All children failed in {}",
            ctx.name()
        )))
    }
}

/// Runs children in order as long as they succeed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequencer;

impl Task for Sequencer {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "Sequencer::run");
        ctx.reset_children_status();
        for i in 0..ctx.num_children() {
            let result = ctx.tick_child(i)?;
            if result.is_running() {
                return Ok(NodeStatus::active(format!(
                    "Executing {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
            if result != StatusCode::Success {
                return Ok(NodeStatus::fail(format!(
                    "Failed to complete {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
        }
        Ok(NodeStatus::success(format!(
            "All children succeeded in {}",
            ctx.name()
        )))
    }
}

/// Runs every child in order and succeeds once all of them finished,
/// whatever their outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct Runner;

impl Task for Runner {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "Runner::run");
        ctx.reset_children_status();
        for i in 0..ctx.num_children() {
            let result = ctx.tick_child(i)?;
            if result.is_running() {
                return Ok(NodeStatus::active(format!(
                    "Executing {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
        }
        Ok(NodeStatus::success(format!(
            "All children finished in {}",
            ctx.name()
        )))
    }
}

/// Ticks every open child each run. The first success wins; fails only when
/// every child failed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Any;

impl Task for Any {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        debug!(node = ctx.name(), "Any::configure");
        ctx.open_all_children();
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "Any::run");
        let mut active = false;
        for i in 0..ctx.num_children() {
            if !ctx.is_open(i) {
                continue;
            }
            let result = ctx.tick_child(i)?;
            if result == StatusCode::Success {
                return Ok(NodeStatus::success(format!(
                    "Found SUCCESS in {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
            active |= result.is_running();
        }
        if active {
            return Ok(NodeStatus::active(format!("Executing {}", ctx.name())));
        }
        Ok(NodeStatus::fail(format!(
            "Failed to complete {}. All children failed.",
            ctx.name()
        )))
    }
}

/// Ticks every open child each run. The first failure wins; succeeds only when
/// every child succeeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct All;

impl Task for All {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        debug!(node = ctx.name(), "All::configure");
        ctx.open_all_children();
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "All::run");
        let mut active = false;
        for i in 0..ctx.num_children() {
            if !ctx.is_open(i) {
                continue;
            }
            let result = ctx.tick_child(i)?;
            if result == StatusCode::Fail {
                return Ok(NodeStatus::fail(format!(
                    "Found FAIL in {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
            active |= result.is_running();
        }
        if active {
            return Ok(NodeStatus::active(format!("Executing {}", ctx.name())));
        }
        Ok(NodeStatus::success(format!(
            "All succeeded in {}",
            ctx.name()
        )))
    }
}

/// Picks one child at random on configure and mirrors its result.
pub struct Random {
    rng: StdRng,
    chosen: Option<usize>,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            chosen: None,
        }
    }

    /// A reproducible sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            chosen: None,
        }
    }

    /// Index of the child picked by the last configure.
    pub fn chosen(&self) -> Option<usize> {
        self.chosen
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for Random {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        if ctx.num_children() == 0 {
            info!(node = ctx.name(), "No children set");
            self.chosen = None;
            return Ok(());
        }
        let chosen = self.rng.gen_range(0..ctx.num_children());
        info!(node = ctx.name(), child = ctx.child_name(chosen), "Selected random child");
        self.chosen = Some(chosen);
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        let Some(chosen) = self.chosen else {
            debug!(node = ctx.name(), "Random::run empty");
            return Ok(NodeStatus::success("No child selected"));
        };
        debug!(node = ctx.name(), child = ctx.child_name(chosen), "Random::run");
        ctx.reset_children_status();
        ctx.tick_child(chosen)
    }
}

/// Runs children one after another without revisiting the ones that already
/// succeeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Progressor {
    index: usize,
}

impl Task for Progressor {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        debug!(node = ctx.name(), "Progressor::configure");
        self.index = 0;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), index = self.index, "Progressor::run");
        while self.index < ctx.num_children() {
            let i = self.index;
            let result = ctx.tick_child(i)?;
            if result.is_running() {
                return Ok(NodeStatus::active(format!(
                    "Executing {}:{}",
                    ctx.name(),
                    ctx.child_name(i)
                )));
            }
            if result != StatusCode::Success {
                return Ok(NodeStatus::new(
                    result.code,
                    format!("Failed to complete {}:{}", ctx.name(), ctx.child_name(i)),
                ));
            }
            self.index += 1;
        }
        Ok(NodeStatus::success(format!(
            "All children succeeded in {}",
            ctx.name()
        )))
    }
}

/// Ticks every open child each run until a majority of all children agrees.
///
/// Ties go to success. The counters accumulate over the whole run and are
/// only reset on configure.
#[derive(Debug, Default, Clone, Copy)]
pub struct Majority {
    num_fail: usize,
    num_succeed: usize,
}

impl Task for Majority {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        debug!(node = ctx.name(), "Majority::configure");
        self.num_fail = 0;
        self.num_succeed = 0;
        ctx.open_all_children();
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "Majority::run");
        let num_children = ctx.num_children() as f64;
        for i in 0..ctx.num_children() {
            if !ctx.is_open(i) {
                continue;
            }
            match ctx.tick_child(i)?.code {
                StatusCode::Fail => self.num_fail += 1,
                StatusCode::Success => self.num_succeed += 1,
                _ => (),
            }
            debug!(
                node = ctx.name(),
                num_fail = self.num_fail,
                num_succeed = self.num_succeed,
                "Majority votes"
            );
            if self.num_fail as f64 / num_children > 0.5 {
                return Ok(NodeStatus::fail("The majority of children failed"));
            }
            if self.num_succeed as f64 / num_children >= 0.5 {
                return Ok(NodeStatus::success("The majority of children succeeded"));
            }
        }
        Ok(NodeStatus::active(format!("Executing {}", ctx.name())))
    }
}

/// Ticks every child in order and returns the first result that is SUCCESS or
/// FAIL.
#[derive(Debug, Default, Clone, Copy)]
pub struct First;

impl Task for First {
    fn kind(&self) -> NodeKind {
        NodeKind::Behavior
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        debug!(node = ctx.name(), "First::run");
        for i in 0..ctx.num_children() {
            let result = ctx.tick_child(i)?;
            if matches!(result.code, StatusCode::Success | StatusCode::Fail) {
                return Ok(result);
            }
        }
        Ok(NodeStatus::active(""))
    }
}
