//! Argument containers carried by every hop.
//!
//! Almost every jump carries a handful of positional values and at most one
//! keyword (the continuation), so both containers stay inline on the stack.

use std::fmt;

use smallvec::SmallVec;

use super::Value;

/// Reserved keyword naming the current continuation
pub const CC: &str = "cc";

/// Positional argument list
pub type Values = SmallVec<[Value; 4]>;

/// Ordered keyword arguments. Inserting an existing name replaces its value.
#[derive(Clone, Default, PartialEq)]
pub struct Kwargs {
    entries: SmallVec<[(String, Value); 2]>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Kwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kwargs = Kwargs::new();
        for (k, v) in iter {
            kwargs.insert(k, v);
        }
        kwargs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing_name() {
        let mut kwargs = Kwargs::new().with("acc", 1i64);
        let old = kwargs.insert("acc", 2i64);
        assert_eq!(old, Some(Value::Long(1)));
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs.get("acc"), Some(&Value::Long(2)));
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let mut kwargs: Kwargs = [("a", 1i64), ("b", 2i64), ("c", 3i64)].into_iter().collect();
        assert_eq!(kwargs.remove("b"), Some(Value::Long(2)));
        assert_eq!(kwargs.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(kwargs.remove("missing"), None);
    }
}
