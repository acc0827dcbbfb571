use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Host key-value store for state that outlives a session.
///
/// Values are JSON. Writes replace the whole value under a key. Failures are
/// the store's own business: callers never see them.
pub trait Memento {
    fn get(&self, key: &str) -> Option<Value>;

    fn update(&self, key: &str, value: Value);

    /// Declare which keys are synchronized across devices.
    fn set_keys_for_sync(&self, keys: &[&str]);

    fn keys_for_sync(&self) -> Vec<String>;
}

impl<M: Memento + ?Sized> Memento for Arc<M> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn update(&self, key: &str, value: Value) {
        (**self).update(key, value)
    }

    fn set_keys_for_sync(&self, keys: &[&str]) {
        (**self).set_keys_for_sync(keys)
    }

    fn keys_for_sync(&self) -> Vec<String> {
        (**self).keys_for_sync()
    }
}

/// Read `key` as `T`, or `default` when absent or undecodable.
pub fn get_or<T: DeserializeOwned>(memento: &dyn Memento, key: &str, default: T) -> T {
    let Some(value) = memento.get(key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("Ignoring undecodable value under {}: {}", key, e);
            default
        }
    }
}

#[derive(Debug, Default)]
struct MementoState {
    values: IndexMap<String, Value>,
    keys_for_sync: Vec<String>,
}

/// Process-local store. Keeps insertion order of keys.
#[derive(Debug, Default)]
pub struct InMemoryMemento {
    state: Mutex<MementoState>,
}

impl InMemoryMemento {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored key, in first-write order.
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().values.keys().cloned().collect()
    }
}

impl Memento for InMemoryMemento {
    fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().values.get(key).cloned()
    }

    fn update(&self, key: &str, value: Value) {
        self.state.lock().values.insert(key.to_string(), value);
    }

    fn set_keys_for_sync(&self, keys: &[&str]) {
        self.state.lock().keys_for_sync = keys.iter().map(|k| k.to_string()).collect();
    }

    fn keys_for_sync(&self) -> Vec<String> {
        self.state.lock().keys_for_sync.clone()
    }
}
