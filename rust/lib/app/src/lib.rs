//! Conduit — a RealWorld social blogging app on the Flux runtime.
//!
//! Structure:
//! - `server/` — in-process Conduit REST API (axum + in-memory store)
//! - `bff/dsl/state/` — Flux state slices (`#[state]` types)
//! - `bff/dsl/request/` — Flux request types (`#[request]` types)
//! - `bff/src/` — handler implementations + Flux wiring
//! - `src/session.rs` — JWT persistence between runs

// Backend.
#[path = "../server/src/mod.rs"]
pub mod server;

// State slices — flat access as `crate::state::*`.
#[path = "../bff/dsl/state/global/mod.rs"]
pub mod state;

// Request types — flat access as `crate::request::*`.
#[path = "../bff/dsl/request/global/mod.rs"]
pub mod request;

// Handler implementations + Flux wiring.
#[path = "../bff/src/mod.rs"]
pub mod handlers;

pub mod session;

mod flow_test;
