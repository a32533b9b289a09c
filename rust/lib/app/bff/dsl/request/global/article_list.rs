//! Article list requests.

use flux_derive::request;

use crate::state::ListTab;

/// Load a page of articles with the slice's current filters.
/// `page` defaults to the slice's `current_page`.
#[request("articles/load")]
pub struct LoadArticlesReq {
    pub page: Option<u64>,
}

/// Switch the home tab (personal feed vs global) and reload page 0.
#[request("articles/change-tab")]
pub struct ChangeTabReq {
    pub tab: ListTab,
}

/// Filter the global feed by one tag.
#[request("articles/by-tag")]
pub struct LoadByTagReq {
    pub tag: String,
}

/// Load a profile's authored articles.
#[request("articles/by-author")]
pub struct LoadByAuthorReq {
    pub username: String,
}

/// Load a profile's favorited articles.
#[request("articles/favorites")]
pub struct LoadFavoritesReq {
    pub username: String,
}

/// Favorite one article in the list.
#[request("articles/favorite")]
pub struct FavoriteReq {
    pub slug: String,
}

/// Unfavorite one article in the list.
#[request("articles/unfavorite")]
pub struct UnfavoriteReq {
    pub slug: String,
}

/// Leaving the home page — reset the list slice.
#[request("home/unload")]
pub struct HomeUnloadReq;
