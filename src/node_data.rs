use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::{
    any::{type_name, Any},
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// A type-erased value stored in node memory.
///
/// Values are reference counted so that remapping can copy them between scopes
/// without requiring the payload type to implement `Clone`.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Key-value memory of a single node scope.
///
/// All access goes through an internal lock, so a `NodeData` can be read and
/// written from several threads ticking trees that share one blackboard.
#[derive(Default)]
pub struct NodeData {
    data: RwLock<HashMap<String, Value>>,
}

impl NodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    pub fn get<T: Clone + 'static>(&self, key: &str) -> Result<T> {
        let data = self.data.read();
        let value = data
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;
        downcast(key, value)
    }

    /// Returns the value under `key`, storing `default` first if the key is absent.
    pub fn get_data<T: Clone + Send + Sync + 'static>(&self, key: &str, default: T) -> Result<T> {
        let mut data = self.data.write();
        let value = data
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(default));
        downcast(key, value)
    }

    pub fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.data.write().insert(key.into(), Arc::new(value));
    }

    /// Read-modify-write of a typed value, holding the lock for the whole update.
    pub fn update<T, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut data = self.data.write();
        let slot = data
            .get_mut(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;
        let mut value: T = downcast(key, slot)?;
        let ret = f(&mut value);
        *slot = Arc::new(value);
        Ok(ret)
    }

    pub fn get_any(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    pub fn set_any(&self, key: impl Into<String>, value: Value) {
        self.data.write().insert(key.into(), value);
    }
}

fn downcast<T: Clone + 'static>(key: &str, value: &Value) -> Result<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| Error::TypeMismatch {
            key: key.to_owned(),
            expected: type_name::<T>(),
        })
}

impl Debug for NodeData {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.data.read().keys()).finish()
    }
}
