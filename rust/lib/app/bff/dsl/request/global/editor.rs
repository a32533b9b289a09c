//! Editor requests.

use flux_derive::request;

/// Open the editor — blank for `None`, prefilled from the article
/// at `slug` otherwise.
#[request("editor/load")]
pub struct EditorLoadReq {
    pub slug: Option<String>,
}

/// Update one form field (`title`, `description` or `body`) by name.
#[request("editor/update-field")]
pub struct EditorUpdateReq {
    pub field: String,
    pub value: String,
}

/// Append a tag to the draft if non-empty and not already present.
#[request("editor/add-tag")]
pub struct EditorAddTagReq {
    pub tag: String,
}

/// Remove a tag from the draft.
#[request("editor/remove-tag")]
pub struct EditorRemoveTagReq {
    pub tag: String,
}

/// Submit the form — update when `slug` is set, create otherwise.
#[request("editor/submit")]
pub struct EditorSubmitReq;
