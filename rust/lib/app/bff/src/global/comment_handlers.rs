//! Comment handler implementations.
//!
//! Entities live at `comments/items/{id}`. `comments/add` inserts a
//! pending comment under a negative id before asking the server; the
//! response swaps it for the real one, a failure removes it again.

use std::sync::atomic::{AtomicI64, Ordering};

use conduit_client::{Comment, ConduitClient, Profile};
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::helpers;

fn comments_state(store: &StateStore) -> CommentsState {
    store
        .get_cloned(CommentsState::PATH)
        .unwrap_or_else(CommentsState::initial)
}

/// Handle `comments/load` — replace all comment entities.
pub async fn handle_load(req: &LoadCommentsReq, store: &StateStore, api: &ConduitClient) {
    let meta = comments_state(store);
    if meta.status.is_loading() {
        return;
    }

    store.set(
        CommentsState::PATH,
        CommentsState {
            status: RequestStatus::Loading,
            errors: None,
        },
    );

    match api.comments(&req.slug).await {
        Ok(comments) => {
            store.remove_prefix(CommentsState::ITEMS);
            for comment in comments {
                store.set(&CommentsState::item_path(comment.id), comment);
            }
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Success,
                    errors: None,
                },
            );
        }
        Err(e) => {
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}

/// Handle `comments/add` — optimistic insert, then reconcile.
pub async fn handle_add(
    req: &AddCommentReq,
    store: &StateStore,
    api: &ConduitClient,
    seq: &AtomicI64,
) {
    let auth = helpers::auth_state(store);
    if !auth.is_authenticated() {
        return;
    }
    let meta = comments_state(store);
    if meta.status.is_loading() {
        return;
    }

    store.set(
        CommentsState::PATH,
        CommentsState {
            status: RequestStatus::Loading,
            errors: None,
        },
    );

    // Pending entity under a temp id so the UI shows it immediately.
    let mut pending_id = None;
    if !req.body.is_empty() {
        if let Some(ref user) = auth.user {
            let id = seq.fetch_sub(1, Ordering::Relaxed);
            let now = chrono::Utc::now().to_rfc3339();
            let pending = Comment {
                id,
                created_at: now.clone(),
                updated_at: now,
                body: req.body.clone(),
                author: Profile {
                    username: user.username.clone(),
                    bio: user.bio.clone(),
                    image: user.image.clone(),
                    following: false,
                },
            };
            store.set(&CommentsState::item_path(id), pending);
            pending_id = Some(id);
        }
    }

    match api.add_comment(&req.slug, &req.body).await {
        Ok(comment) => {
            if let Some(id) = pending_id {
                store.remove(&CommentsState::item_path(id));
            }
            store.set(&CommentsState::item_path(comment.id), comment);
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Success,
                    errors: None,
                },
            );
        }
        Err(e) => {
            if let Some(id) = pending_id {
                store.remove(&CommentsState::item_path(id));
            }
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}

/// Handle `comments/delete` — the id must name a stored entity.
pub async fn handle_delete(req: &DeleteCommentReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    if store.get(&CommentsState::item_path(req.id)).is_none() {
        return;
    }
    let meta = comments_state(store);
    if meta.status.is_loading() {
        return;
    }

    store.set(
        CommentsState::PATH,
        CommentsState {
            status: RequestStatus::Loading,
            errors: None,
        },
    );

    match api.delete_comment(&req.slug, req.id).await {
        Ok(()) => {
            store.remove(&CommentsState::item_path(req.id));
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Success,
                    errors: None,
                },
            );
        }
        Err(e) => {
            store.set(
                CommentsState::PATH,
                CommentsState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}
