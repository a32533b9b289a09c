use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::store::StateStore;
use crate::trie::Trie;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased handler function stored in the router.
///
/// Takes owned values so the returned future can be `'static`:
/// - `String` — the matched request path
/// - `Arc<dyn Any + Send + Sync>` — type-erased request payload
/// - `Arc<StateStore>` — the state store for reading/writing state
type ErasedHandler =
    Arc<dyn Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Request router mapping path patterns to async handlers via trie matching.
///
/// Handlers are registered with `on(pattern, handler)` and dispatched
/// with `dispatch(path, payload, store)`. Multiple handlers can match
/// a single path (via wildcards), and all are called sequentially.
///
/// # Examples
///
/// ```ignore
/// let router = Router::new();
/// router.on("auth/login", |path, payload, store| async move {
///     let req = payload.downcast_ref::<LoginRequest>().unwrap();
///     store.set("auth/state", AuthState { token: Some(jwt), .. });
/// });
///
/// router.dispatch("auth/login", Arc::new(req), store).await;
/// ```
pub struct Router {
    trie: Trie<ErasedHandler>,
}

impl Router {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self {
            trie: Trie::new(),
        }
    }

    /// Register an async handler for a path pattern.
    ///
    /// Pattern supports MQTT-style wildcards:
    /// - `"auth/login"` — exact match
    /// - `"auth/+"` — matches any single level under `auth/`
    /// - `"auth/#"` — matches any levels under `auth/`
    /// - `"#"` — matches everything
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |path: String,
                  payload: Arc<dyn Any + Send + Sync>,
                  store: Arc<StateStore>|
                  -> BoxFuture { Box::pin(handler(path, payload, store)) },
        );
        self.trie.insert(pattern, handler);
    }

    /// Dispatch a request to all matching handlers.
    ///
    /// Handlers are called sequentially in the order they match.
    /// If no handler matches, this is a no-op (no error).
    pub async fn dispatch(
        &self,
        path: &str,
        payload: Arc<dyn Any + Send + Sync>,
        store: Arc<StateStore>,
    ) {
        let handlers = self.trie.match_path(path);
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
    }

    /// Check if any handler is registered for the exact pattern.
    pub fn has_handler(&self, pattern: &str) -> bool {
        self.trie.has_pattern(pattern)
    }

    /// Check if any handler would match the given request path.
    pub fn matches(&self, path: &str) -> bool {
        !self.trie.match_path(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
