use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::warn;

use crate::error::Result;

/// String key/value storage, the shape of the browser's `Storage` API.
///
/// The frontend backs this with `sessionStorage` and `localStorage`; tests use
/// [`MemoryStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Reads and parses a JSON value. Unparseable entries are treated as absent.
    fn get_json<T>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        let raw = match self.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "Storage read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "Ignoring malformed stored value");
                None
            }
        }
    }

    fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
        T: Serialize,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        assert_eq!(store.get_json::<Vec<String>>("broken"), None);
        store.set_json("list", &vec!["a".to_string()]).unwrap();
        assert_eq!(store.get_json::<Vec<String>>("list"), Some(vec!["a".to_string()]));
    }
}
