use super::{load, Literal, RemapDef, TreeDef, TreeRootDef, TreeSource};
use crate::{blackboard::Blackboard, error::LoadError, node::Node, registry::Registry};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
struct YamlSource {
    behavior_tree: BTreeMap<String, YamlNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlNode {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: BTreeMap<String, Literal>,
    /// `key: node.key`
    #[serde(default)]
    remap: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<YamlNode>,
}

impl TryFrom<YamlNode> for TreeDef {
    type Error = LoadError;

    fn try_from(node: YamlNode) -> Result<Self, LoadError> {
        let remaps = node
            .remap
            .into_iter()
            .map(|(key, source)| -> Result<_, LoadError> {
                let (source_node, source_key) = source.split_once('.').ok_or_else(|| {
                    LoadError::Parse(format!("remap source {source:?} is not node.key"))
                })?;
                Ok(RemapDef {
                    key,
                    source_node: source_node.to_owned(),
                    source_key: source_key.to_owned(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(TreeDef {
            ty: node.ty,
            name: node.name,
            data: node.data.into_iter().collect(),
            remaps,
            children: node
                .children
                .into_iter()
                .map(TreeDef::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Reads the trees listed under the `behavior_tree` key of a YAML document.
pub fn parse_yaml(yaml: &str) -> Result<TreeSource, LoadError> {
    let source: YamlSource = serde_yaml::from_str(yaml)?;
    let tree_defs = source
        .behavior_tree
        .into_iter()
        .map(|(name, root)| -> Result<_, LoadError> {
            Ok(TreeRootDef {
                name,
                root: root.try_into()?,
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(TreeSource { tree_defs })
}

/// Instantiates every tree of a YAML document on one shared blackboard.
pub fn load_yaml(
    yaml: &str,
    registry: &Registry,
    blackboard: &Blackboard,
) -> Result<HashMap<String, Node>, LoadError> {
    parse_yaml(yaml)?
        .tree_defs
        .iter()
        .map(|tree| -> Result<_, LoadError> {
            Ok((tree.name.clone(), load(&tree.root, registry, blackboard)?))
        })
        .collect()
}
