//! Shared helpers for handlers — slice accessors and selectors.

use conduit_client::{ArticleQuery, Comment};
use conduit_flux::StateStore;

use crate::state::*;

/// Current auth slice, or the initial one if never set.
pub fn auth_state(store: &StateStore) -> AuthState {
    store
        .get_cloned(AuthState::PATH)
        .unwrap_or_else(AuthState::initial)
}

/// Current app slice, or the initial one if never set.
pub fn app_state(store: &StateStore) -> AppState {
    store
        .get_cloned(AppState::PATH)
        .unwrap_or_else(AppState::initial)
}

/// Current list slice, or the initial one if never set.
pub fn list_state(store: &StateStore) -> ArticleListState {
    store
        .get_cloned(ArticleListState::PATH)
        .unwrap_or_else(ArticleListState::initial)
}

/// Username of the logged-in user, if any.
pub fn current_username(store: &StateStore) -> Option<String> {
    auth_state(store).user.map(|u| u.username)
}

/// True when both token and user are present.
pub fn is_authenticated(store: &StateStore) -> bool {
    auth_state(store).is_authenticated()
}

/// Set a one-shot redirect on the app slice.
pub fn redirect_to(store: &StateStore, to: &str) {
    let mut app = app_state(store);
    app.redirect_to = Some(to.to_string());
    store.set(AppState::PATH, app);
}

/// Tick the view-change counter. Every page-unload handler calls this
/// so subscribers can tell a fresh visit from no change.
pub fn bump_view_counter(store: &StateStore) {
    let mut app = app_state(store);
    app.view_change_counter += 1;
    store.set(AppState::PATH, app);
}

/// Build the wire query from the list slice's filters.
pub fn list_query(list: &ArticleListState, page: u64) -> ArticleQuery {
    let mut query = ArticleQuery::page(page, list.articles_per_page);
    if let Some(ref tag) = list.tag {
        query = query.tag(tag.clone());
    }
    if let Some(ref author) = list.author {
        query = query.author(author.clone());
    }
    if let Some(ref favorited) = list.favorited {
        query = query.favorited(favorited.clone());
    }
    query
}

/// All comment entities, newest first.
pub fn all_comments(store: &StateStore) -> Vec<Comment> {
    let mut comments: Vec<Comment> = store
        .scan(CommentsState::ITEMS)
        .into_iter()
        .filter_map(|(_, v)| v.downcast_ref::<Comment>().cloned())
        .collect();
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    comments
}

/// Whether the comment at `id` belongs to the logged-in user.
pub fn is_comment_author(store: &StateStore, id: i64) -> bool {
    let Some(username) = current_username(store) else {
        return false;
    };
    store
        .get_cloned::<Comment>(&CommentsState::item_path(id))
        .map(|c| c.author.username == username)
        .unwrap_or(false)
}
