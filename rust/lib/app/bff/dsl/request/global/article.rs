//! Single-article requests.

use flux_derive::request;

/// Load one article by slug.
#[request("article/load")]
pub struct LoadArticleReq {
    pub slug: String,
}

/// Delete the current user's article.
#[request("article/delete")]
pub struct DeleteArticleReq {
    pub slug: String,
}

/// Leaving the article page — reset article, editor and comments.
#[request("article/unload")]
pub struct ArticleUnloadReq;
