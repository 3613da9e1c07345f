use thiserror::Error;

/// Errors raised while building or ticking a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Could not add node {child} to {parent}. Name is not unique.")]
    DuplicateChild { parent: String, child: String },

    #[error("Attempted to add too many nodes to {parent}")]
    TooManyChildren { parent: String },

    #[error("Node {child} is not a child of {parent}")]
    ChildNotFound { parent: String, child: String },

    #[error("run_cb must be defined for {node}")]
    Unimplemented { node: String },

    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    #[error("Value of key {key:?} is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Can not map to same key twice: {key:?}")]
    RemapConflict { key: String },

    /// Failure reported by application code inside a hook.
    #[error("{0}")]
    Task(String),
}

impl Error {
    pub fn task(message: impl ToString) -> Self {
        Self::Task(message.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse tree source: {0}")]
    Parse(String),

    #[error("The tree {0:?} does not exist")]
    MissingTree(String),

    #[error("Node type not found {0:?}")]
    MissingNode(String),

    #[error("Remap source {source_node}.{key} of {node} not found")]
    MissingRemapSource {
        node: String,
        source_node: String,
        key: String,
    },

    #[error("{source} while loading {node}")]
    Node {
        node: String,
        #[source]
        source: Error,
    },
}
