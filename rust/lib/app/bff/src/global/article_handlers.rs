//! Single-article handler implementations.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::helpers;

/// Handle `article/load`.
pub async fn handle_load(req: &LoadArticleReq, store: &StateStore, api: &ConduitClient) {
    store.set(
        ArticleState::PATH,
        ArticleState {
            status: RequestStatus::Loading,
            article: None,
            errors: None,
        },
    );

    match api.article(&req.slug).await {
        Ok(article) => {
            store.set(
                ArticleState::PATH,
                ArticleState {
                    status: RequestStatus::Success,
                    article: Some(article),
                    errors: None,
                },
            );
        }
        Err(e) => {
            store.set(
                ArticleState::PATH,
                ArticleState {
                    status: RequestStatus::Failure,
                    article: None,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}

/// Handle `article/delete` — only the author's own article; the server
/// enforces that, we only require a login.
pub async fn handle_delete(req: &DeleteArticleReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }

    match api.delete_article(&req.slug).await {
        Ok(()) => {
            store.set(ArticleState::PATH, ArticleState::initial());
            helpers::redirect_to(store, "/");
        }
        Err(e) => {
            let current = store
                .get_cloned(ArticleState::PATH)
                .unwrap_or_else(ArticleState::initial);
            store.set(
                ArticleState::PATH,
                ArticleState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                    ..current
                },
            );
        }
    }
}

/// Handle `article/unload` — reset article, editor and all comments.
pub async fn handle_unload(store: &StateStore) {
    store.set(ArticleState::PATH, ArticleState::initial());
    store.set(EditorState::PATH, EditorState::initial());
    store.set(CommentsState::PATH, CommentsState::initial());
    store.remove_prefix(CommentsState::ITEMS);
    helpers::bump_view_counter(store);
}
