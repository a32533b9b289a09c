//! Axum handlers for the Conduit REST API.
//!
//! Each handler is hand-written. Identity comes from the
//! `Authorization: Token <jwt>` header (verified signature, user must
//! still exist). Validation failures answer 422 with
//! `{"errors": {"field": ["message"]}}`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use conduit_client::{
    ArticleDraft, ArticleResponse, ArticlesResponse, CommentResponse, CommentsResponse, LoginUser,
    NewComment, NewUser, ProfileResponse, TagsResponse, User, UserResponse, UserUpdate,
};
use serde::Deserialize;

use crate::server::jwt::JwtService;
use crate::server::store::{ArticleFilter, ConduitStore, ServiceError, UserRecord};

/// Shared state for the API handlers.
pub struct ServerStateInner {
    pub store: ConduitStore,
    pub jwt: JwtService,
}

pub type ServerState = Arc<ServerStateInner>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "unauthorized").into_response()
            }
            ServiceError::Forbidden => (StatusCode::FORBIDDEN, "forbidden").into_response(),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            ServiceError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ServiceError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

// ── Request bodies ──

#[derive(Deserialize)]
struct UserBody<T> {
    user: T,
}

#[derive(Deserialize)]
struct ArticleBody {
    article: ArticleDraft,
}

#[derive(Deserialize)]
struct CommentBody {
    comment: NewComment,
}

// ── Auth helpers ──

/// Extract and verify the current user from the JWT.
/// Returns the username or `ServiceError::Unauthorized`.
fn current_user(headers: &HeaderMap, state: &ServerStateInner) -> Result<String, ServiceError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "))
        .ok_or(ServiceError::Unauthorized)?;
    let claims = state
        .jwt
        .verify(token)
        .map_err(|_| ServiceError::Unauthorized)?;
    if state.store.user(&claims.sub).is_none() {
        return Err(ServiceError::Unauthorized);
    }
    Ok(claims.sub)
}

/// Identity for endpoints that work anonymously but personalize
/// `favorited`/`following` when a valid token is present.
fn viewer(headers: &HeaderMap, state: &ServerStateInner) -> Option<String> {
    current_user(headers, state).ok()
}

/// `{"user": ...}` payload with a freshly minted token.
fn user_payload(
    state: &ServerStateInner,
    record: &UserRecord,
) -> Result<Json<UserResponse>, ServiceError> {
    let token = state
        .jwt
        .issue(&record.username)
        .map_err(ServiceError::Internal)?;
    Ok(Json(UserResponse {
        user: User {
            email: record.email.clone(),
            token,
            username: record.username.clone(),
            bio: record.bio.clone(),
            image: record.image.clone(),
        },
    }))
}

// ── Users ──

/// POST /api/users — public.
pub async fn register(
    State(state): State<ServerState>,
    Json(body): Json<UserBody<NewUser>>,
) -> Result<Json<UserResponse>, ServiceError> {
    let record = state
        .store
        .register(&body.user.username, &body.user.email, &body.user.password)?;
    user_payload(&state, &record)
}

/// POST /api/users/login — public.
pub async fn login(
    State(state): State<ServerState>,
    Json(body): Json<UserBody<LoginUser>>,
) -> Result<Json<UserResponse>, ServiceError> {
    let record = state.store.login(&body.user.email, &body.user.password)?;
    user_payload(&state, &record)
}

/// GET /api/user
pub async fn get_current_user(
    headers: HeaderMap,
    State(state): State<ServerState>,
) -> Result<Json<UserResponse>, ServiceError> {
    let username = current_user(&headers, &state)?;
    let record = state
        .store
        .user(&username)
        .ok_or(ServiceError::Unauthorized)?;
    user_payload(&state, &record)
}

/// PUT /api/user
pub async fn update_current_user(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Json(body): Json<UserBody<UserUpdate>>,
) -> Result<Json<UserResponse>, ServiceError> {
    let username = current_user(&headers, &state)?;
    let record = state.store.update_user(&username, &body.user)?;
    // Token is minted for the (possibly renamed) username, so a
    // username change does not invalidate the session.
    user_payload(&state, &record)
}

// ── Profiles ──

/// GET /api/profiles/{username}
pub async fn get_profile(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let viewer = viewer(&headers, &state);
    let profile = state.store.profile(viewer.as_deref(), &username)?;
    Ok(Json(ProfileResponse { profile }))
}

/// POST /api/profiles/{username}/follow
pub async fn follow_user(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let profile = state.store.set_following(&me, &username, true)?;
    Ok(Json(ProfileResponse { profile }))
}

/// DELETE /api/profiles/{username}/follow
pub async fn unfollow_user(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let profile = state.store.set_following(&me, &username, false)?;
    Ok(Json(ProfileResponse { profile }))
}

// ── Articles ──

/// GET /api/articles — public, filterable.
pub async fn list_articles(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Query(filter): Query<ArticleFilter>,
) -> Json<ArticlesResponse> {
    let viewer = viewer(&headers, &state);
    Json(state.store.list_articles(viewer.as_deref(), &filter))
}

/// GET /api/articles/feed
pub async fn get_feed(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<ArticlesResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    Ok(Json(state.store.feed(&me, &filter)))
}

/// GET /api/articles/{slug}
pub async fn get_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ServiceError> {
    let viewer = viewer(&headers, &state);
    let article = state.store.article(viewer.as_deref(), &slug)?;
    Ok(Json(ArticleResponse { article }))
}

/// POST /api/articles
pub async fn create_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Json(body): Json<ArticleBody>,
) -> Result<Json<ArticleResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let draft = body.article;
    let article = state.store.create_article(
        &me,
        &draft.title,
        &draft.description,
        &draft.body,
        &draft.tag_list,
    )?;
    Ok(Json(ArticleResponse { article }))
}

/// PUT /api/articles/{slug}
pub async fn update_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(body): Json<ArticleBody>,
) -> Result<Json<ArticleResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let draft = body.article;
    let article = state.store.update_article(
        &me,
        &slug,
        &draft.title,
        &draft.description,
        &draft.body,
        &draft.tag_list,
    )?;
    Ok(Json(ArticleResponse { article }))
}

/// DELETE /api/articles/{slug}
pub async fn delete_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<(), ServiceError> {
    let me = current_user(&headers, &state)?;
    state.store.delete_article(&me, &slug)
}

// ── Favorites ──

/// POST /api/articles/{slug}/favorite
pub async fn favorite_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let article = state.store.set_favorited(&me, &slug, true)?;
    Ok(Json(ArticleResponse { article }))
}

/// DELETE /api/articles/{slug}/favorite
pub async fn unfavorite_article(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let article = state.store.set_favorited(&me, &slug, false)?;
    Ok(Json(ArticleResponse { article }))
}

// ── Comments ──

/// GET /api/articles/{slug}/comments — public.
pub async fn get_comments(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<CommentsResponse>, ServiceError> {
    let viewer = viewer(&headers, &state);
    let comments = state.store.comments(viewer.as_deref(), &slug)?;
    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/articles/{slug}/comments
pub async fn add_comment(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<Json<CommentResponse>, ServiceError> {
    let me = current_user(&headers, &state)?;
    let comment = state.store.add_comment(&me, &slug, &body.comment.body)?;
    Ok(Json(CommentResponse { comment }))
}

/// DELETE /api/articles/{slug}/comments/{id}
pub async fn delete_comment(
    headers: HeaderMap,
    State(state): State<ServerState>,
    Path((slug, id)): Path<(String, i64)>,
) -> Result<(), ServiceError> {
    let me = current_user(&headers, &state)?;
    state.store.delete_comment(&me, &slug, id)
}

// ── Tags ──

/// GET /api/tags — public.
pub async fn get_tags(State(state): State<ServerState>) -> Json<TagsResponse> {
    Json(TagsResponse {
        tags: state.store.tags(),
    })
}

/// Build the full router. All endpoints live under `/api`.
pub fn api_router(state: ServerState) -> axum::Router {
    use axum::routing::{delete, get, post};
    let api = axum::Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/user", get(get_current_user).put(update_current_user))
        .route("/profiles/{username}", get(get_profile))
        .route(
            "/profiles/{username}/follow",
            post(follow_user).delete(unfollow_user),
        )
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/feed", get(get_feed))
        .route(
            "/articles/{slug}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route(
            "/articles/{slug}/favorite",
            post(favorite_article).delete(unfavorite_article),
        )
        .route(
            "/articles/{slug}/comments",
            get(get_comments).post(add_comment),
        )
        .route("/articles/{slug}/comments/{id}", delete(delete_comment))
        .route("/tags", get(get_tags))
        .with_state(state);
    axum::Router::new().nest("/api", api)
}

// ── Tests ──
