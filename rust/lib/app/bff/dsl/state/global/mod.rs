//! Global state definitions.
//!
//! Each file defines one state slice stored at a well-known path.
//! `#[state("path")]` generates the `PATH` const; the shared
//! [`RequestStatus`] enum tracks every slice's request lifecycle.

pub mod app;
pub mod article;
pub mod article_list;
pub mod auth;
pub mod comments;
pub mod editor;
pub mod profile;
pub mod status;
pub mod tags;

pub use app::AppState;
pub use article::ArticleState;
pub use article_list::{ArticleListState, ListTab};
pub use auth::AuthState;
pub use comments::CommentsState;
pub use editor::EditorState;
pub use profile::ProfileState;
pub use status::RequestStatus;
pub use tags::TagsState;
