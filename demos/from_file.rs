//! Loads trees from a text or YAML file and ticks `main` until it finishes.
//!
//! ```sh
//! cargo run --example from_file -- demos/count.tree
//! cargo run --example from_file -- demos/count.yaml
//! ```

use std::{collections::HashMap, env, fs};

use task_behavior_engine::{
    boxify, load, load_yaml, parse_source, Blackboard, Context, LoadError, Node, NodeStatus,
    Registry, Result, StatusCode, Task,
};
use tracing_subscriber::EnvFilter;

struct Count;

impl Task for Count {
    fn configure(&mut self, ctx: &mut Context) -> Result<()> {
        let start = ctx.data().get_data("start", 0i64)?;
        ctx.data().set("index", start);
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> Result<NodeStatus> {
        let limit = ctx.data().get_data("limit", 5i64)?;
        let index: i64 = ctx.data().get("index")?;
        if index < limit {
            ctx.data().set("index", index + 1);
            return Ok(NodeStatus::active(format!("{} {}", ctx.name(), index + 1)));
        }
        Ok(NodeStatus::success(format!("{} finished at {index}", ctx.name())))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/count.tree".to_string());
    let file = fs::read_to_string(&path)?;

    let mut registry = Registry::default();
    registry.register("Count", boxify(|| Count));

    let bb = Blackboard::new();
    let mut trees: HashMap<String, Node> = if path.ends_with(".yaml") || path.ends_with(".yml") {
        load_yaml(&file, &registry, &bb)?
    } else {
        parse_source(&file)?
            .tree_defs
            .iter()
            .map(|tree| -> Result<_, LoadError> {
                Ok((tree.name.clone(), load(&tree.root, &registry, &bb)?))
            })
            .collect::<Result<_, _>>()?
    };

    let Some(main) = trees.get_mut("main") else {
        anyhow::bail!("{path} has no tree named main");
    };

    let mut ticks = 0;
    loop {
        let result = main.tick()?;
        ticks += 1;
        println!("{ticks}: {result}");
        if result != StatusCode::Active {
            break;
        }
    }

    for (id, status) in bb.get_status() {
        eprintln!("{id}: {status}");
    }

    Ok(())
}
