//! Popular tags state — stored at `tags/state`.

use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// Sidebar tag cloud.
#[state("tags/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsState {
    pub status: RequestStatus,
    pub tags: Vec<String>,
}

impl TagsState {
    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            tags: Vec::new(),
        }
    }
}
