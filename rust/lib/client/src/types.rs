//! Wire types for the Conduit REST API.
//!
//! Payloads are camelCase JSON wrapped in entity envelopes:
//! `{"user": ...}`, `{"article": ...}`, `{"articles": [...], "articlesCount": n}`.
//! Timestamps travel as RFC 3339 strings.

use serde::{Deserialize, Serialize};

// ── Entities ────────────────────────────────────────────────────────

/// The authenticated account, as returned under `{"user": ...}`.
///
/// Carries the JWT the server minted for this session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Public author view, as returned under `{"profile": ...}`.
///
/// `following` is relative to the requesting user (always false when
/// the request was anonymous).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub favorited: bool,
    pub favorites_count: u64,
    pub author: Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub author: Profile,
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub article: Article,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub articles: Vec<Article>,
    pub articles_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

// ── Request payloads ────────────────────────────────────────────────

/// Credentials for `POST /users/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

/// Registration payload for `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Settings update for `PUT /user`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Editor payload for `POST /articles` and `PUT /articles/:slug`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

/// Comment payload for `POST /articles/:slug/comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
}

// ── Article query ───────────────────────────────────────────────────

/// Query string for the article list endpoints.
///
/// Pagination is page-based on the caller side; the wire protocol takes
/// `limit` and `offset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ArticleQuery {
    /// Page-based pagination: `limit = per_page`, `offset = page * per_page`.
    /// Pages are zero-based.
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some(page * per_page),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn author(mut self, username: impl Into<String>) -> Self {
        self.author = Some(username.into());
        self
    }

    pub fn favorited(mut self, username: impl Into<String>) -> Self {
        self.favorited = Some(username.into());
        self
    }

    /// Key/value pairs for the query string, skipping unset fields.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref tag) = self.tag {
            pairs.push(("tag", tag.clone()));
        }
        if let Some(ref author) = self.author {
            pairs.push(("author", author.clone()));
        }
        if let Some(ref favorited) = self.favorited {
            pairs.push(("favorited", favorited.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}
