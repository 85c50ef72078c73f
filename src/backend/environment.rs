//! Shared mutable bindings for continuation bodies.
//!
//! Closures capture an [`Environment`] handle by clone; every clone sees the
//! same store. Changes made while one invocation of a captured continuation
//! runs are visible to the next invocation of the same continuation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::errors::{RuntimeError, RuntimeResult};
use super::models::Value;

#[derive(Clone, Default)]
pub struct Environment {
    bindings: Rc<RefCell<HashMap<String, Value>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    /// Lookup that fails with `UnboundName`
    pub fn require(&self, name: &str) -> RuntimeResult<Value> {
        self.get(name)
            .ok_or_else(|| RuntimeError::UnboundName(name.to_string()))
    }

    /// Bind `name`, returning the previous value if there was one
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.bindings.borrow_mut().insert(name.into(), value.into())
    }

    /// Replace the value bound to `name` with `f(old)` and return the new value.
    /// The borrow is released before `f` runs so `f` may use this environment.
    pub fn update<F>(&self, name: &str, f: F) -> RuntimeResult<Value>
    where
        F: FnOnce(Value) -> RuntimeResult<Value>,
    {
        let old = self.require(name)?;
        let new = f(old)?;
        self.set(name, new.clone());
        Ok(new)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.bindings.borrow_mut().remove(name)
    }

    /// Whether two handles share one store
    pub fn shares_store_with(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.bindings, &other.bindings)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings = self.bindings.borrow();
        let mut names: Vec<&String> = bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::new();
        let alias = env.clone();
        env.set("x", 1i64);
        assert_eq!(alias.get("x"), Some(Value::Long(1)));
        assert!(env.shares_store_with(&alias));
        assert!(!env.shares_store_with(&Environment::new()));
    }

    #[test]
    fn test_require_unbound() {
        let env = Environment::new();
        assert!(matches!(
            env.require("nope"),
            Err(RuntimeError::UnboundName(ref n)) if n == "nope"
        ));
    }

    #[test]
    fn test_update_may_read_environment() {
        let env = Environment::new();
        env.set("count", 1i64);
        env.set("step", 10i64);
        let inner = env.clone();
        let new = env
            .update("count", |old| {
                Ok(Value::Long(old.as_long()? + inner.require("step")?.as_long()?))
            })
            .unwrap();
        assert_eq!(new, Value::Long(11));
        assert_eq!(env.get("count"), Some(Value::Long(11)));
    }

    #[test]
    fn test_set_returns_previous() {
        let env = Environment::new();
        assert_eq!(env.set("a", 1i64), None);
        assert_eq!(env.set("a", 2i64), Some(Value::Long(1)));
        assert_eq!(env.remove("a"), Some(Value::Long(2)));
        assert!(!env.contains("a"));
    }
}
