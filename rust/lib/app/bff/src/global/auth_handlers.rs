//! Auth handler implementations.

use conduit_client::{ConduitClient, LoginUser, NewUser, UserUpdate};
use conduit_flux::StateStore;
use tracing::warn;

use crate::request::*;
use crate::session::SessionStore;
use crate::state::*;

use super::helpers;

/// Save the token for the next startup. Persistence failures are
/// logged and swallowed; the in-memory session is already live.
async fn persist_token(session: &dyn SessionStore, token: &str) {
    if let Err(e) = session.save(token).await {
        warn!("failed to persist session token: {e}");
    }
}

/// Handle `auth/login`.
pub async fn handle_login(
    req: &LoginReq,
    store: &StateStore,
    api: &ConduitClient,
    session: &dyn SessionStore,
) {
    let auth = helpers::auth_state(store);
    if auth.status.is_loading() {
        return;
    }

    store.set(
        AuthState::PATH,
        AuthState {
            status: RequestStatus::Loading,
            errors: None,
            ..auth
        },
    );

    let credentials = LoginUser {
        email: req.email.clone(),
        password: req.password.clone(),
    };
    match api.login(&credentials).await {
        Ok(user) => {
            api.set_token(&user.token);
            persist_token(session, &user.token).await;
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Success,
                    token: Some(user.token.clone()),
                    user: Some(user),
                    errors: None,
                },
            );
            helpers::redirect_to(store, "/");
        }
        Err(e) => {
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Failure,
                    token: None,
                    user: None,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}

/// Handle `auth/register`.
pub async fn handle_register(
    req: &RegisterReq,
    store: &StateStore,
    api: &ConduitClient,
    session: &dyn SessionStore,
) {
    let auth = helpers::auth_state(store);
    if auth.status.is_loading() {
        return;
    }

    store.set(
        AuthState::PATH,
        AuthState {
            status: RequestStatus::Loading,
            errors: None,
            ..auth
        },
    );

    let registration = NewUser {
        username: req.username.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
    };
    match api.register(&registration).await {
        Ok(user) => {
            api.set_token(&user.token);
            persist_token(session, &user.token).await;
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Success,
                    token: Some(user.token.clone()),
                    user: Some(user),
                    errors: None,
                },
            );
            helpers::redirect_to(store, "/");
        }
        Err(e) => {
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Failure,
                    token: None,
                    user: None,
                    errors: Some(e.field_errors()),
                },
            );
        }
    }
}

/// Handle `auth/load-user` — refresh the user for the installed token.
/// A dead token leaves the app unauthenticated instead of failing.
pub async fn handle_load_user(store: &StateStore, api: &ConduitClient) {
    let auth = helpers::auth_state(store);
    if auth.token.is_none() || auth.status.is_loading() {
        return;
    }

    store.set(
        AuthState::PATH,
        AuthState {
            status: RequestStatus::Loading,
            ..auth
        },
    );

    match api.current_user().await {
        Ok(user) => {
            api.set_token(&user.token);
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Success,
                    token: Some(user.token.clone()),
                    user: Some(user),
                    errors: None,
                },
            );
        }
        Err(_) => {
            api.clear_token();
            store.set(AuthState::PATH, AuthState::initial());
        }
    }
}

/// Handle `auth/update-user`. The server answers with a token minted
/// for the (possibly renamed) username, so it replaces the stored one.
pub async fn handle_update_user(
    req: &UpdateUserReq,
    store: &StateStore,
    api: &ConduitClient,
    session: &dyn SessionStore,
) {
    let auth = helpers::auth_state(store);
    if !auth.is_authenticated() || auth.status.is_loading() {
        return;
    }

    store.set(
        AuthState::PATH,
        AuthState {
            status: RequestStatus::Loading,
            errors: None,
            ..auth
        },
    );

    let update = UserUpdate {
        email: req.email.clone(),
        username: req.username.clone(),
        bio: req.bio.clone(),
        image: req.image.clone(),
        password: req.password.clone(),
    };
    match api.update_user(&update).await {
        Ok(user) => {
            api.set_token(&user.token);
            persist_token(session, &user.token).await;
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Success,
                    token: Some(user.token.clone()),
                    user: Some(user),
                    errors: None,
                },
            );
            helpers::redirect_to(store, "/");
        }
        Err(e) => {
            let auth = helpers::auth_state(store);
            store.set(
                AuthState::PATH,
                AuthState {
                    status: RequestStatus::Failure,
                    errors: Some(e.field_errors()),
                    ..auth
                },
            );
        }
    }
}

/// Handle `auth/logout` — reset the slice, drop the token everywhere.
pub async fn handle_logout(store: &StateStore, api: &ConduitClient, session: &dyn SessionStore) {
    api.clear_token();
    if let Err(e) = session.clear().await {
        warn!("failed to clear session token: {e}");
    }
    store.set(AuthState::PATH, AuthState::initial());
    helpers::redirect_to(store, "/");
}
