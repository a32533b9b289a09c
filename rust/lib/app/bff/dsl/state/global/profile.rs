//! Profile page state — stored at `profile/state`.

use conduit_client::Profile;
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// The profile currently open on the profile page.
///
/// `following` comes from the server response, never computed locally.
#[state("profile/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl ProfileState {
    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            profile: None,
        }
    }
}
