//! Global request definitions.
//!
//! Each struct is a typed request payload with a `PATH` const generated
//! by `#[request("path")]`. Emitting one through [`Flux::emit`] runs the
//! matching handler.
//!
//! [`Flux::emit`]: conduit_flux::Flux::emit

pub mod app;
pub mod article;
pub mod article_list;
pub mod auth;
pub mod comments;
pub mod editor;
pub mod profile;
pub mod tags;

pub use app::{AppLoadReq, ClearRedirectReq};
pub use article::{ArticleUnloadReq, DeleteArticleReq, LoadArticleReq};
pub use article_list::{
    ChangeTabReq, FavoriteReq, HomeUnloadReq, LoadArticlesReq, LoadByAuthorReq, LoadByTagReq,
    LoadFavoritesReq, UnfavoriteReq,
};
pub use auth::{LoadUserReq, LoginReq, LogoutReq, RegisterReq, UpdateUserReq};
pub use comments::{AddCommentReq, DeleteCommentReq, LoadCommentsReq};
pub use editor::{
    EditorAddTagReq, EditorLoadReq, EditorRemoveTagReq, EditorSubmitReq, EditorUpdateReq,
};
pub use profile::{FollowReq, LoadProfileReq, ProfileUnloadReq, UnfollowReq};
pub use tags::LoadTagsReq;
