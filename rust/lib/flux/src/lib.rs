//! Flux — the Conduit client state engine.
//!
//! A path-based state machine with pub/sub. Rust owns all client state and
//! logic; a rendering layer (web, mobile, TUI) only subscribes to paths and
//! emits requests.
//!
//! # Three Primitives
//!
//! - `get(path)` — read state at a path, Arc zero-copy
//! - `emit(path, payload)` — send a request, Trie-routed to handler(s)
//! - `subscribe(pattern)` — observe state changes, Trie-matched notifications
//!
//! # Path Addressing
//!
//! All state and requests live in a flat path namespace with `/` as
//! separator:
//! - Slices: `auth/state`, `articles/list`, `profile/state`
//! - Entities: `comments/items/{id}`
//! - Requests: `auth/login`, `articles/favorite`, `comments/add`
//!
//! # Trie Pattern Matching
//!
//! Both subscriptions and request handlers use MQTT-style wildcards:
//! - Exact: `auth/state`
//! - Single-level: `comments/items/+` matches every comment entity
//! - Multi-level: `articles/#` matches everything under `articles/`
//! - All: `#` matches everything
//!
//! # Example
//!
//! ```ignore
//! use conduit_flux::Flux;
//!
//! let app = Flux::new();
//!
//! // Register handlers.
//! app.on("tags/load", |_, _, store| async move {
//!     store.set("tags/state", TagsState::loading());
//!     // ...fetch, then:
//!     store.set("tags/state", TagsState::loaded(tags));
//! });
//!
//! // Subscribe to changes.
//! app.subscribe("tags/#", |path, value| {
//!     println!("state changed: {}", path);
//! });
//!
//! // Emit requests.
//! app.emit("tags/load", ()).await;
//! ```

pub mod app;
pub mod router;
pub mod store;
pub mod trie;
pub mod value;

// Re-export primary types at crate root.
pub use app::Flux;
pub use router::{BoxFuture, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
