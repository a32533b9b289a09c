//! Auth state — stored at `auth/state`.

use conduit_client::{FieldErrors, User};
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// Authentication state — the UI reads this to decide what to show.
///
/// Authenticated means BOTH `token` and `user` are present; a token
/// alone (restored from disk, not yet verified) is not enough.
#[state("auth/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl AuthState {
    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            token: None,
            user: None,
            errors: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}
