//! In-process Conduit API server.
//!
//! Implements the RealWorld REST API over an in-memory store — enough
//! backend for the integration tests and the demo binary, not a
//! production server.

pub mod jwt;
pub mod routes;
pub mod store;
