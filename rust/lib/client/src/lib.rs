//! Conduit HTTP API client.
//!
//! A thin typed wrapper over the RealWorld REST API. Endpoint methods
//! return the unwrapped entity (envelopes are handled internally) and
//! failures are mapped to [`ApiError`], with 422 validation bodies
//! decoded into [`FieldErrors`].
//!
//! # Usage
//!
//! ```ignore
//! use conduit_client::{ArticleQuery, ConduitClient, LoginUser};
//!
//! let client = ConduitClient::new("http://localhost:3000/api");
//! let user = client.login(&LoginUser { email, password }).await?;
//! client.set_token(&user.token);
//! let feed = client.feed(&ArticleQuery::page(0, 10)).await?;
//! ```

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;

mod error;
mod types;

pub use error::{ApiError, FieldErrors};
pub use types::{
    Article, ArticleDraft, ArticleQuery, ArticleResponse, ArticlesResponse, Comment,
    CommentResponse, CommentsResponse, LoginUser, NewComment, NewUser, Profile, ProfileResponse,
    TagsResponse, User, UserResponse, UserUpdate,
};

/// Body shape of a 422 response.
#[derive(Deserialize)]
struct ErrorsBody {
    errors: BTreeMap<String, Vec<String>>,
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client for one Conduit server.
///
/// Holds an optional JWT; while set, every request carries an
/// `Authorization: Token {jwt}` header. The token cell is behind a lock
/// so one client can be shared across handlers.
pub struct ConduitClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ConduitClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    /// Client pre-loaded with a stored JWT (session restore).
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Self::new(base_url);
        client.set_token(token);
        client
    }

    // ── Token cell ──────────────────────────────────────────────────

    /// Install the JWT attached to subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// Drop the JWT; subsequent requests go out anonymous.
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// Current JWT, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    // ── Plumbing ────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the Authorization header when a token is held.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().unwrap().as_deref() {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    /// Parse an API response, mapping error statuses to `ApiError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            if code == 422 {
                if let Ok(parsed) = serde_json::from_str::<ErrorsBody>(&body) {
                    return Err(ApiError::Unprocessable(FieldErrors(parsed.errors)));
                }
            }
            return Err(ApiError::Server {
                status: code,
                message: body,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Check status for endpoints that return no body.
    async fn parse_empty(resp: reqwest::Response) -> Result<(), ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: code,
                message: body,
            });
        }
        Ok(())
    }

    // ── Auth & account ──────────────────────────────────────────────

    /// Log in with email + password. The returned `User` carries a fresh
    /// JWT; the caller decides whether to `set_token` it.
    pub async fn login(&self, credentials: &LoginUser) -> Result<User, ApiError> {
        let req = self
            .http
            .post(self.url("/users/login"))
            .json(&serde_json::json!({ "user": credentials }));
        let resp = self.authed(req).send().await?;
        let body: UserResponse = Self::parse(resp).await?;
        Ok(body.user)
    }

    /// Register a new account.
    pub async fn register(&self, registration: &NewUser) -> Result<User, ApiError> {
        let req = self
            .http
            .post(self.url("/users"))
            .json(&serde_json::json!({ "user": registration }));
        let resp = self.authed(req).send().await?;
        let body: UserResponse = Self::parse(resp).await?;
        Ok(body.user)
    }

    /// Fetch the account behind the current token.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let req = self.http.get(self.url("/user"));
        let resp = self.authed(req).send().await?;
        let body: UserResponse = Self::parse(resp).await?;
        Ok(body.user)
    }

    /// Update account settings. Unset fields are left unchanged.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let req = self
            .http
            .put(self.url("/user"))
            .json(&serde_json::json!({ "user": update }));
        let resp = self.authed(req).send().await?;
        let body: UserResponse = Self::parse(resp).await?;
        Ok(body.user)
    }

    // ── Profiles ────────────────────────────────────────────────────

    pub async fn profile(&self, username: &str) -> Result<Profile, ApiError> {
        let req = self.http.get(self.url(&format!("/profiles/{}", username)));
        let resp = self.authed(req).send().await?;
        let body: ProfileResponse = Self::parse(resp).await?;
        Ok(body.profile)
    }

    pub async fn follow(&self, username: &str) -> Result<Profile, ApiError> {
        let req = self
            .http
            .post(self.url(&format!("/profiles/{}/follow", username)));
        let resp = self.authed(req).send().await?;
        let body: ProfileResponse = Self::parse(resp).await?;
        Ok(body.profile)
    }

    pub async fn unfollow(&self, username: &str) -> Result<Profile, ApiError> {
        let req = self
            .http
            .delete(self.url(&format!("/profiles/{}/follow", username)));
        let resp = self.authed(req).send().await?;
        let body: ProfileResponse = Self::parse(resp).await?;
        Ok(body.profile)
    }

    // ── Articles ────────────────────────────────────────────────────

    /// Global article list, filtered by the query (tag, author,
    /// favorited, pagination).
    pub async fn articles(&self, query: &ArticleQuery) -> Result<ArticlesResponse, ApiError> {
        let req = self.http.get(self.url("/articles")).query(&query.to_pairs());
        let resp = self.authed(req).send().await?;
        Self::parse(resp).await
    }

    /// Personal feed: articles by authors the current user follows.
    /// Requires a token.
    pub async fn feed(&self, query: &ArticleQuery) -> Result<ArticlesResponse, ApiError> {
        let req = self
            .http
            .get(self.url("/articles/feed"))
            .query(&query.to_pairs());
        let resp = self.authed(req).send().await?;
        Self::parse(resp).await
    }

    pub async fn article(&self, slug: &str) -> Result<Article, ApiError> {
        let req = self.http.get(self.url(&format!("/articles/{}", slug)));
        let resp = self.authed(req).send().await?;
        let body: ArticleResponse = Self::parse(resp).await?;
        Ok(body.article)
    }

    pub async fn create_article(&self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let req = self
            .http
            .post(self.url("/articles"))
            .json(&serde_json::json!({ "article": draft }));
        let resp = self.authed(req).send().await?;
        let body: ArticleResponse = Self::parse(resp).await?;
        Ok(body.article)
    }

    pub async fn update_article(&self, slug: &str, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let req = self
            .http
            .put(self.url(&format!("/articles/{}", slug)))
            .json(&serde_json::json!({ "article": draft }));
        let resp = self.authed(req).send().await?;
        let body: ArticleResponse = Self::parse(resp).await?;
        Ok(body.article)
    }

    pub async fn delete_article(&self, slug: &str) -> Result<(), ApiError> {
        let req = self.http.delete(self.url(&format!("/articles/{}", slug)));
        let resp = self.authed(req).send().await?;
        Self::parse_empty(resp).await
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// Favorite an article. The response carries the updated `favorited`
    /// flag and `favoritesCount`.
    pub async fn favorite(&self, slug: &str) -> Result<Article, ApiError> {
        let req = self
            .http
            .post(self.url(&format!("/articles/{}/favorite", slug)));
        let resp = self.authed(req).send().await?;
        let body: ArticleResponse = Self::parse(resp).await?;
        Ok(body.article)
    }

    pub async fn unfavorite(&self, slug: &str) -> Result<Article, ApiError> {
        let req = self
            .http
            .delete(self.url(&format!("/articles/{}/favorite", slug)));
        let resp = self.authed(req).send().await?;
        let body: ArticleResponse = Self::parse(resp).await?;
        Ok(body.article)
    }

    // ── Comments ────────────────────────────────────────────────────

    pub async fn comments(&self, slug: &str) -> Result<Vec<Comment>, ApiError> {
        let req = self
            .http
            .get(self.url(&format!("/articles/{}/comments", slug)));
        let resp = self.authed(req).send().await?;
        let body: CommentsResponse = Self::parse(resp).await?;
        Ok(body.comments)
    }

    pub async fn add_comment(&self, slug: &str, body: &str) -> Result<Comment, ApiError> {
        let req = self
            .http
            .post(self.url(&format!("/articles/{}/comments", slug)))
            .json(&serde_json::json!({ "comment": NewComment { body: body.to_string() } }));
        let resp = self.authed(req).send().await?;
        let parsed: CommentResponse = Self::parse(resp).await?;
        Ok(parsed.comment)
    }

    pub async fn delete_comment(&self, slug: &str, id: i64) -> Result<(), ApiError> {
        let req = self
            .http
            .delete(self.url(&format!("/articles/{}/comments/{}", slug, id)));
        let resp = self.authed(req).send().await?;
        Self::parse_empty(resp).await
    }

    // ── Tags ────────────────────────────────────────────────────────

    pub async fn tags(&self) -> Result<Vec<String>, ApiError> {
        let req = self.http.get(self.url("/tags"));
        let resp = self.authed(req).send().await?;
        let body: TagsResponse = Self::parse(resp).await?;
        Ok(body.tags)
    }
}
