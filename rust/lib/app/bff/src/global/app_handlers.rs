//! App lifecycle handler implementations.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::{auth_handlers, helpers};

/// Handle `app/load` — restore a persisted token, then mark the app
/// loaded. A dead token still loads the app, just unauthenticated.
pub async fn handle_load(req: &AppLoadReq, store: &StateStore, api: &ConduitClient) {
    if let Some(ref token) = req.token {
        api.set_token(token);
        let auth = helpers::auth_state(store);
        store.set(
            AuthState::PATH,
            AuthState {
                token: Some(token.clone()),
                ..auth
            },
        );
        auth_handlers::handle_load_user(store, api).await;
    }

    let mut app = helpers::app_state(store);
    app.loaded = true;
    store.set(AppState::PATH, app);
}

/// Handle `app/clear-redirect`.
pub async fn handle_clear_redirect(store: &StateStore) {
    let mut app = helpers::app_state(store);
    app.redirect_to = None;
    store.set(AppState::PATH, app);
}
