//! Request lifecycle status shared by every slice.

use serde::{Deserialize, Serialize};

/// Where a slice's in-flight request currently stands.
///
/// Handlers move a slice `Idle → Loading → Success | Failure`; unload
/// requests put it back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }
}
