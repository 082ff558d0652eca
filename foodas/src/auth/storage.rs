use parking_lot::RwLock;
use shared::Result;
use std::collections::HashMap;

/// Durable string key-value storage for session credentials.
///
/// Implementations must make every `set`/`clear` visible to a later process
/// reading the same store; the in-memory variant only lives as long as the value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Clearing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<()>;
}

/// Process-local store, used by tests and for sessions that should not survive exit
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{KeyValueStore, MemoryStore};
    use parking_lot::Mutex;
    use shared::{Error, Result};

    /// Memory store whose writes to one key fail a set number of times
    pub(crate) struct FlakyStore {
        inner: MemoryStore,
        key: &'static str,
        failures: Mutex<usize>,
    }

    impl FlakyStore {
        pub(crate) fn failing(key: &'static str, failures: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                key,
                failures: Mutex::new(failures),
            }
        }

        pub(crate) fn fail_next(&self, failures: usize) {
            *self.failures.lock() = failures;
        }

        pub(crate) fn is_empty(&self) -> bool {
            self.inner.is_empty()
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let mut failures = self.failures.lock();
            if key == self.key && *failures > 0 {
                *failures -= 1;
                return Err(Error::Storage(format!("disk full writing '{}'", key)));
            }
            self.inner.set(key, value)
        }

        fn clear(&self, key: &str) -> Result<()> {
            self.inner.clear(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_clear() {
        let store = MemoryStore::new();
        assert!(store.get("access").unwrap().is_none());

        store.set("access", "abc").unwrap();
        assert_eq!(store.get("access").unwrap().as_deref(), Some("abc"));

        store.set("access", "def").unwrap();
        assert_eq!(store.get("access").unwrap().as_deref(), Some("def"));
        assert_eq!(store.len(), 1);

        store.clear("access").unwrap();
        store.clear("access").unwrap();
        assert!(store.is_empty());
    }
}
