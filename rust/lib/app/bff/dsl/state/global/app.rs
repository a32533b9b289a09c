//! App-level state — stored at `app/state`.

use flux_derive::state;
use serde::{Deserialize, Serialize};

/// App shell state — startup flag, navigation hints.
///
/// `redirect_to` is a one-shot navigation request: a handler sets it,
/// the consumer navigates, then emits `app/clear-redirect`.
/// `view_change_counter` ticks on every page unload so subscribers can
/// tell "same path, new visit" apart from no change at all.
#[state("app/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub app_name: String,
    pub loaded: bool,
    pub view_change_counter: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl AppState {
    pub fn initial() -> Self {
        Self {
            app_name: "Conduit".into(),
            loaded: false,
            view_change_counter: 0,
            redirect_to: None,
        }
    }
}
