//! Profile handler implementations.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::request::*;
use crate::state::*;

use super::helpers;

/// Handle `profile/load`.
pub async fn handle_load(req: &LoadProfileReq, store: &StateStore, api: &ConduitClient) {
    store.set(
        ProfileState::PATH,
        ProfileState {
            status: RequestStatus::Loading,
            profile: None,
        },
    );

    match api.profile(&req.username).await {
        Ok(profile) => {
            store.set(
                ProfileState::PATH,
                ProfileState {
                    status: RequestStatus::Success,
                    profile: Some(profile),
                },
            );
        }
        Err(_) => {
            store.set(
                ProfileState::PATH,
                ProfileState {
                    status: RequestStatus::Failure,
                    profile: None,
                },
            );
        }
    }
}

/// Handle `profile/follow` — the whole profile comes back from the
/// server; `following` is never flipped locally.
pub async fn handle_follow(req: &FollowReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    if let Ok(profile) = api.follow(&req.username).await {
        store.set(
            ProfileState::PATH,
            ProfileState {
                status: RequestStatus::Success,
                profile: Some(profile),
            },
        );
    }
}

/// Handle `profile/unfollow`.
pub async fn handle_unfollow(req: &UnfollowReq, store: &StateStore, api: &ConduitClient) {
    if !helpers::is_authenticated(store) {
        return;
    }
    if let Ok(profile) = api.unfollow(&req.username).await {
        store.set(
            ProfileState::PATH,
            ProfileState {
                status: RequestStatus::Success,
                profile: Some(profile),
            },
        );
    }
}

/// Handle `profile/unload` — reset profile and article list.
pub async fn handle_unload(store: &StateStore) {
    store.set(ProfileState::PATH, ProfileState::initial());
    store.set(ArticleListState::PATH, ArticleListState::initial());
    helpers::bump_view_counter(store);
}
