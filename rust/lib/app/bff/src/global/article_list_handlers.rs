//! Article list handler implementations.
//!
//! Every filter change funnels through [`load_page`]: write the new
//! filter set with `Loading`, query, then write the result. Reloads
//! re-use whatever filters the slice already holds.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::helpers;

/// Query `page` for the filters in `list` and store the outcome.
async fn load_page(
    store: &StateStore,
    api: &ConduitClient,
    mut list: ArticleListState,
    page: u64,
) {
    list.status = RequestStatus::Loading;
    list.current_page = page;
    store.set(ArticleListState::PATH, list.clone());

    let query = helpers::list_query(&list, page);
    let result = match list.tab {
        Some(ListTab::Feed) => api.feed(&query).await,
        _ => api.articles(&query).await,
    };

    match result {
        Ok(resp) => {
            list.status = RequestStatus::Success;
            list.articles = resp.articles;
            list.articles_count = resp.articles_count;
        }
        Err(_) => {
            list.status = RequestStatus::Failure;
        }
    }
    store.set(ArticleListState::PATH, list);
}

/// Handle `articles/load` — re-query with the slice's current filters.
pub async fn handle_load(req: &LoadArticlesReq, store: &StateStore, api: &ConduitClient) {
    let list = helpers::list_state(store);
    if list.status.is_loading() {
        return;
    }
    let page = req.page.unwrap_or(list.current_page);
    load_page(store, api, list, page).await;
}

/// Handle `articles/change-tab` — switch feeds, drop the tag filter.
pub async fn handle_change_tab(req: &ChangeTabReq, store: &StateStore, api: &ConduitClient) {
    let mut list = helpers::list_state(store);
    list.tab = Some(req.tab);
    list.tag = None;
    load_page(store, api, list, 0).await;
}

/// Handle `articles/by-tag`.
pub async fn handle_by_tag(req: &LoadByTagReq, store: &StateStore, api: &ConduitClient) {
    let list = ArticleListState {
        tag: Some(req.tag.clone()),
        articles_per_page: 10,
        ..ArticleListState::initial()
    };
    load_page(store, api, list, 0).await;
}

/// Handle `articles/by-author` — profile page, 5 per page.
pub async fn handle_by_author(req: &LoadByAuthorReq, store: &StateStore, api: &ConduitClient) {
    let list = ArticleListState {
        author: Some(req.username.clone()),
        articles_per_page: 5,
        ..ArticleListState::initial()
    };
    load_page(store, api, list, 0).await;
}

/// Handle `articles/favorites` — profile page, 5 per page.
pub async fn handle_favorites(req: &LoadFavoritesReq, store: &StateStore, api: &ConduitClient) {
    let list = ArticleListState {
        favorited: Some(req.username.clone()),
        articles_per_page: 5,
        ..ArticleListState::initial()
    };
    load_page(store, api, list, 0).await;
}

/// Patch the list entry for `slug` with the server's favorite verdict.
/// Only `favorited` and `favorites_count` change; everything else in
/// the row is kept as loaded.
fn reconcile_favorite(store: &StateStore, updated: &conduit_client::Article) {
    let mut list = helpers::list_state(store);
    let Some(row) = list.articles.iter_mut().find(|a| a.slug == updated.slug) else {
        return;
    };
    row.favorited = updated.favorited;
    row.favorites_count = updated.favorites_count;
    store.set(ArticleListState::PATH, list);
}

/// Handle `articles/favorite`.
pub async fn handle_favorite(req: &FavoriteReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    if let Ok(article) = api.favorite(&req.slug).await {
        reconcile_favorite(store, &article);
    }
}

/// Handle `articles/unfavorite`.
pub async fn handle_unfavorite(req: &UnfavoriteReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    if let Ok(article) = api.unfavorite(&req.slug).await {
        reconcile_favorite(store, &article);
    }
}

/// Handle `home/unload` — reset the slice for the next visit.
pub async fn handle_home_unload(store: &StateStore) {
    store.set(ArticleListState::PATH, ArticleListState::initial());
    helpers::bump_view_counter(store);
}
