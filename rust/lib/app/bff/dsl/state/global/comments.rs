//! Comment state — meta slice at `comments/state`, one entity per
//! comment at `comments/items/{id}`.
//!
//! Entities are normalized by id so a single add or delete touches one
//! path instead of rewriting the whole list. Pending comments from an
//! optimistic add use negative ids until the server answers.

use conduit_client::FieldErrors;
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// Comment request lifecycle, shared by load/add/delete.
#[state("comments/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsState {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl CommentsState {
    /// Parent path of the per-comment entities.
    pub const ITEMS: &'static str = "comments/items";

    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            errors: None,
        }
    }

    /// Dynamic path: `comments/items/{id}`.
    pub fn item_path(id: i64) -> String {
        format!("{}/{}", Self::ITEMS, id)
    }
}
