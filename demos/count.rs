use std::{thread, time::Duration};

use task_behavior_engine::{
    branches::Sequencer, decorators::Repeat, Blackboard, Context, Node, NodeStatus, Result,
    StatusCode, Task,
};
use tracing_subscriber::EnvFilter;

/// Starts at `start` and counts up to `limit`. It returns ACTIVE until the
/// count has reached the limit, then SUCCESS.
struct Count {
    start: i64,
    limit: i64,
}

impl Count {
    fn new() -> Self {
        Self { start: 0, limit: 5 }
    }
}

impl Task for Count {
    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        self.start = ctx.data().get_data("start", 0i64)?;
        self.limit = ctx.data().get_data("limit", 5i64)?;
        ctx.data().set("index", self.start);
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        let index: i64 = ctx.data().get("index")?;
        if index < self.limit {
            ctx.data().set("index", index + 1);
            return Ok(NodeStatus::active(format!("Count {}", index + 1)));
        }
        Ok(NodeStatus::success(format!("Count finished at {index}")))
    }

    fn cleanup(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.data().set("index", self.start);
        Ok(())
    }
}

fn tick_until_done(node: &mut Node) -> Result<()> {
    loop {
        let result = node.tick()?;
        println!("{result}");
        thread::sleep(Duration::from_millis(100));
        if result != StatusCode::Active {
            return Ok(());
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("Running example 1 -- using a node");

    let mut count = Node::with_task("count_index", Count::new());
    tick_until_done(&mut count)?;

    println!("Running example 2 (10 times) -- using a decorator");

    let count = Node::with_task("count_index", Count::new());
    let mut repeat = Node::with_task("repeat_count", Repeat).with_child(count)?;
    for _ in 0..10 {
        println!("{}", repeat.tick()?);
        thread::sleep(Duration::from_millis(100));
    }

    println!("Running example 3 -- using a behavior");

    let bb = Blackboard::new();
    let mut finish_counts = Node::with_task("finish_counts", Sequencer).with_blackboard(&bb);
    for (name, limit) in [("count_1", 1i64), ("count_2", 2), ("count_3", 3)] {
        let count = Node::with_task(name, Count::new()).with_blackboard(&bb);
        // change the limit for the count
        bb.save("limit", limit, Some(count.id()));
        finish_counts.add_child(count)?;
    }
    tick_until_done(&mut finish_counts)?;

    Ok(())
}
