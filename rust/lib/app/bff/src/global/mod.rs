//! Handler implementations for global requests.
//!
//! One module per slice, each a set of free async fns taking the
//! request, the state store and the API client. `register_handlers`
//! in the parent module wires them to their request paths.

pub mod app_handlers;
pub mod article_handlers;
pub mod article_list_handlers;
pub mod auth_handlers;
pub mod comment_handlers;
pub mod editor_handlers;
pub mod helpers;
pub mod profile_handlers;
pub mod tag_handlers;
