//! Tree definitions that can be written by hand and instantiated with a
//! [`Registry`](crate::Registry).
//!
//! Two source formats produce the same [`TreeSource`]: a compact text format
//! parsed with nom ([`parse_file`]) and YAML ([`parse_yaml`]).

mod loader;
mod nom_parser;
mod yaml_parser;

use crate::error::LoadError;
use serde::Deserialize;

pub use self::{
    loader::load,
    nom_parser::{parse_file, parse_source},
    yaml_parser::{load_yaml, parse_yaml},
};

/// A value written into the memory of a node when the tree is loaded.
///
/// Integers are stored as `i64`, floats as `f64`, strings as `String`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// `key <- source_node.source_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapDef {
    pub key: String,
    pub source_node: String,
    pub source_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeDef {
    pub ty: String,
    pub name: Option<String>,
    pub data: Vec<(String, Literal)>,
    pub remaps: Vec<RemapDef>,
    pub children: Vec<TreeDef>,
}

impl TreeDef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
            data: vec![],
            remaps: vec![],
            children: vec![],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Literal) -> Self {
        self.data.push((key.into(), value));
        self
    }

    pub fn with_remap(
        mut self,
        key: impl Into<String>,
        source_node: impl Into<String>,
        source_key: impl Into<String>,
    ) -> Self {
        self.remaps.push(RemapDef {
            key: key.into(),
            source_node: source_node.into(),
            source_key: source_key.into(),
        });
        self
    }

    pub fn with_child(mut self, child: TreeDef) -> Self {
        self.children.push(child);
        self
    }

    /// The node name, which defaults to the type name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRootDef {
    pub name: String,
    pub root: TreeDef,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeSource {
    pub tree_defs: Vec<TreeRootDef>,
}

impl TreeSource {
    pub fn get(&self, name: &str) -> Result<&TreeDef, LoadError> {
        self.tree_defs
            .iter()
            .find(|tree| tree.name == name)
            .map(|tree| &tree.root)
            .ok_or_else(|| LoadError::MissingTree(name.to_owned()))
    }

    /// The tree named `main`.
    pub fn main(&self) -> Result<&TreeDef, LoadError> {
        self.get("main")
    }
}
