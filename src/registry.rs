use crate::{
    branches::{All, Any, First, Majority, Progressor, Random, Runner, Selector, Sequencer},
    decorators::{Fail, Negate, Repeat, Succeed, Until, UntilCount, While},
    leaves::{ContinueNode, FailNode, SuccessNode},
    node::Task,
};
use std::collections::HashMap;

pub type Constructor = Box<dyn Fn() -> Box<dyn Task> + Send + Sync>;

pub fn boxify<T>(cons: impl (Fn() -> T) + Send + Sync + 'static) -> Constructor
where
    T: Task + 'static,
{
    Box::new(move || Box::new(cons()))
}

/// Named task constructors used to instantiate tree definitions.
pub struct Registry {
    node_types: HashMap<String, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut ret = Self {
            node_types: HashMap::new(),
        };
        ret.register("Selector", boxify(|| Selector));
        ret.register("Sequencer", boxify(|| Sequencer));
        ret.register("Runner", boxify(|| Runner));
        ret.register("Any", boxify(|| Any));
        ret.register("All", boxify(|| All));
        ret.register("Random", boxify(Random::new));
        ret.register("Progressor", boxify(Progressor::default));
        ret.register("Majority", boxify(Majority::default));
        ret.register("First", boxify(|| First));
        ret.register("Negate", boxify(|| Negate));
        ret.register("Repeat", boxify(|| Repeat));
        ret.register("While", boxify(|| While));
        ret.register("Until", boxify(|| Until));
        ret.register("UntilCount", boxify(UntilCount::default));
        ret.register("Fail", boxify(|| Fail));
        ret.register("Succeed", boxify(|| Succeed));
        ret.register("AlwaysSuccess", boxify(|| SuccessNode));
        ret.register("AlwaysFail", boxify(|| FailNode));
        ret.register("Continue", boxify(|| ContinueNode));
        ret
    }
}

impl Registry {
    /// A registry without any node types.
    pub fn empty() -> Self {
        Self {
            node_types: HashMap::new(),
        }
    }

    pub fn register(&mut self, type_name: impl ToString, constructor: Constructor) {
        self.node_types.insert(type_name.to_string(), constructor);
    }

    pub fn build(&self, type_name: &str) -> Option<Box<dyn Task>> {
        self.node_types
            .get(type_name)
            .map(|constructor| constructor())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.node_types.contains_key(type_name)
    }
}
