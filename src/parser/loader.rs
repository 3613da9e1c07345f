use super::{Literal, RemapDef, TreeDef};
use crate::{
    blackboard::{Blackboard, NodeId},
    error::LoadError,
    node::Node,
    registry::Registry,
};
use tracing::debug;

/// Instantiate a tree definition with the tasks of `registry`, every node
/// sharing `blackboard`.
///
/// Literal parameters are written into the memory of their node. Remaps are
/// resolved after the whole tree is built, so a node may pull a key from any
/// other node of the same tree, including ones defined later in the source.
/// When several nodes share a name the first one in pre-order wins.
pub fn load(
    tree: &TreeDef,
    registry: &Registry,
    blackboard: &Blackboard,
) -> Result<Node, LoadError> {
    let mut loaded = Loaded::default();
    let root = load_recurse(tree, registry, blackboard, &mut loaded)?;

    for (node_id, node_name, remap) in loaded.remaps {
        let source_id = loaded
            .names
            .iter()
            .find(|(name, _)| *name == remap.source_node)
            .map(|(_, id)| *id)
            .ok_or_else(|| LoadError::MissingRemapSource {
                node: node_name.clone(),
                source_node: remap.source_node.clone(),
                key: remap.source_key.clone(),
            })?;
        debug!(
            "remap {}.{} <- {}.{}",
            node_name, remap.key, remap.source_node, remap.source_key
        );
        blackboard
            .add_remapping(source_id, &remap.source_key, node_id, &remap.key)
            .map_err(|source| LoadError::Node {
                node: node_name,
                source,
            })?;
    }

    Ok(root)
}

#[derive(Default)]
struct Loaded<'src> {
    names: Vec<(&'src str, NodeId)>,
    remaps: Vec<(NodeId, String, &'src RemapDef)>,
}

fn load_recurse<'src>(
    def: &'src TreeDef,
    registry: &Registry,
    blackboard: &Blackboard,
    loaded: &mut Loaded<'src>,
) -> Result<Node, LoadError> {
    let task = registry
        .build(&def.ty)
        .ok_or_else(|| LoadError::MissingNode(def.ty.clone()))?;
    let mut node = Node::with_boxed_task(def.name(), task).with_blackboard(blackboard);
    debug!("loading {} ({})", def.name(), def.ty);

    for (key, value) in &def.data {
        match value {
            Literal::Int(i) => node.set_nodedata(key, *i),
            Literal::Float(f) => node.set_nodedata(key, *f),
            Literal::Bool(b) => node.set_nodedata(key, *b),
            Literal::Str(s) => node.set_nodedata(key, s.clone()),
        }
    }

    loaded.names.push((def.name(), node.id()));
    loaded.remaps.extend(
        def.remaps
            .iter()
            .map(|remap| (node.id(), def.name().to_owned(), remap)),
    );

    for child in &def.children {
        let child_node = load_recurse(child, registry, blackboard, loaded)?;
        node.add_child(child_node)
            .map_err(|source| LoadError::Node {
                node: def.name().to_owned(),
                source,
            })?;
    }

    Ok(node)
}
