//! Editor handler implementations.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::helpers;

fn editor_state(store: &StateStore) -> EditorState {
    store
        .get_cloned(EditorState::PATH)
        .unwrap_or_else(EditorState::initial)
}

/// Handle `editor/load` — blank form for `None`, otherwise fetch the
/// article at `slug` and prefill.
pub async fn handle_load(req: &EditorLoadReq, store: &StateStore, api: &ConduitClient) {
    let Some(ref slug) = req.slug else {
        store.set(EditorState::PATH, EditorState::initial());
        return;
    };

    store.set(
        EditorState::PATH,
        EditorState {
            status: RequestStatus::Loading,
            ..EditorState::initial()
        },
    );

    match api.article(slug).await {
        Ok(article) => {
            store.set(EditorState::PATH, EditorState::from_article(&article));
        }
        Err(e) => {
            store.set(
                EditorState::PATH,
                EditorState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                    ..EditorState::initial()
                },
            );
        }
    }
}

/// Handle `editor/update-field` — patch one field by name.
/// Unknown field names are ignored; any edit clears old errors.
pub async fn handle_update_field(req: &EditorUpdateReq, store: &StateStore) {
    let mut editor = editor_state(store);
    match req.field.as_str() {
        "title" => editor.title = req.value.clone(),
        "description" => editor.description = req.value.clone(),
        "body" => editor.body = req.value.clone(),
        _ => return,
    }
    editor.errors = None;
    store.set(EditorState::PATH, editor);
}

/// Handle `editor/add-tag`.
pub async fn handle_add_tag(req: &EditorAddTagReq, store: &StateStore) {
    if req.tag.is_empty() {
        return;
    }
    let mut editor = editor_state(store);
    if editor.tag_list.iter().any(|t| t == &req.tag) {
        return;
    }
    editor.tag_list.push(req.tag.clone());
    store.set(EditorState::PATH, editor);
}

/// Handle `editor/remove-tag`.
pub async fn handle_remove_tag(req: &EditorRemoveTagReq, store: &StateStore) {
    let mut editor = editor_state(store);
    editor.tag_list.retain(|t| t != &req.tag);
    store.set(EditorState::PATH, editor);
}

/// Handle `editor/submit` — update when the form carries a slug,
/// create otherwise. The published article lands in `article/state`.
pub async fn handle_submit(store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    let editor = editor_state(store);
    if editor.status.is_loading() {
        return;
    }

    store.set(
        EditorState::PATH,
        EditorState {
            status: RequestStatus::Loading,
            errors: None,
            ..editor.clone()
        },
    );

    let draft = editor.draft();
    let result = match editor.slug {
        Some(ref slug) => api.update_article(slug, &draft).await,
        None => api.create_article(&draft).await,
    };

    match result {
        Ok(article) => {
            let slug = article.slug.clone();
            store.set(
                ArticleState::PATH,
                ArticleState {
                    status: RequestStatus::Success,
                    article: Some(article),
                    errors: None,
                },
            );
            store.set(EditorState::PATH, EditorState::initial());
            helpers::redirect_to(store, &format!("/article/{}", slug));
        }
        Err(e) => {
            store.set(
                EditorState::PATH,
                EditorState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                    ..editor
                },
            );
        }
    }
}
