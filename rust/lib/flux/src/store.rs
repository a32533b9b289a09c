use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::trie::Trie;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Per-path state store with trie-based subscription routing.
///
/// - `set(path, value)` stores a value and notifies all matching subscribers.
/// - `get(path)` reads the current value (cheap Arc clone).
/// - `scan(prefix)` lists all children under a prefix path.
/// - `subscribe(pattern, handler)` registers a change handler.
/// - `unsubscribe(pattern, id)` removes a handler.
///
/// Uses `BTreeMap` internally for ordered prefix scanning.
pub struct StateStore {
    /// Current state values, keyed by exact path. BTreeMap for ordered scan.
    values: RwLock<BTreeMap<String, StateValue>>,
    /// Trie mapping subscription patterns to handler entries.
    handlers: Trie<HandlerEntry>,
    /// Monotonic counter for subscription IDs.
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl StateStore {
    /// Create a new empty StateStore.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at the given path and notify matching subscribers.
    ///
    /// Wraps the value in `StateValue` (Arc) internally.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    /// Set a pre-built StateValue at the given path and notify matching subscribers.
    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
        }
        // Notify all subscribers whose pattern matches this path.
        let entries = self.handlers.match_path(path);
        for entry in entries {
            (entry.handler)(path, &value);
        }
    }

    /// Get the current state value at the given path.
    ///
    /// Returns a cloned `StateValue` (cheap Arc clone, no data copy).
    /// Returns `None` if no value is set at this path.
    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Get a clone of the typed value at the given path.
    ///
    /// Returns `None` if the path is unset or holds a different type.
    /// Shorthand for `get(path)` followed by a downcast and clone; handlers
    /// use it to read a slice before producing the next version of it.
    pub fn get_cloned<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path)
            .and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the state value at the given path.
    ///
    /// Returns the old value if present. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        values.remove(path)
    }

    /// Remove all entries whose path starts with `{prefix}/`.
    ///
    /// The exact `prefix` path itself is kept. Returns the number of entries
    /// removed. Does NOT notify subscribers. Used to clear entity collections
    /// such as `comments/items/*` when a page unloads.
    pub fn remove_prefix(&self, prefix: &str) -> usize {
        let mut values = self.values.write().unwrap();
        let scan_prefix = format!("{}/", prefix);
        let doomed: Vec<String> = values
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            values.remove(key);
        }
        doomed.len()
    }

    /// Scan all entries whose path starts with `{prefix}/`.
    ///
    /// Does NOT include the exact `prefix` path itself, only children.
    /// Results are ordered by path (BTreeMap ordering).
    ///
    /// Example: `scan("comments/items")` returns entries at
    /// `comments/items/1`, `comments/items/2`, etc.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        let scan_prefix = format!("{}/", prefix);
        values
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Check if a value exists at the given path.
    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap();
        values.contains_key(path)
    }

    /// Get the total number of stored paths.
    pub fn len(&self) -> usize {
        let values = self.values.read().unwrap();
        values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to state changes matching the given trie pattern.
    ///
    /// The handler is called synchronously whenever `set` or `set_value`
    /// is called on a path that matches the pattern.
    ///
    /// Returns a `SubscriptionId` that can be used to unsubscribe.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandlerEntry {
            id,
            handler: Arc::new(handler),
        };
        self.handlers.insert(pattern, entry);
        id
    }

    /// Unsubscribe a handler by its subscription ID and pattern.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.handlers.remove(pattern, |entry| entry.id == id);
    }

    /// Get a snapshot of all paths and values.
    ///
    /// Returns entries ordered by path.
    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get all paths currently stored.
    pub fn paths(&self) -> Vec<String> {
        let values = self.values.read().unwrap();
        values.keys().cloned().collect()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
