//! Tag handler implementations.

use conduit_client::ConduitClient;
use conduit_flux::StateStore;

use crate::state::*;

/// Handle `tags/load`.
pub async fn handle_load(store: &StateStore, api: &ConduitClient) {
    let tags = store
        .get_cloned(TagsState::PATH)
        .unwrap_or_else(TagsState::initial);
    if tags.status.is_loading() {
        return;
    }

    store.set(
        TagsState::PATH,
        TagsState {
            status: RequestStatus::Loading,
            tags: tags.tags,
        },
    );

    match api.tags().await {
        Ok(tags) => {
            store.set(
                TagsState::PATH,
                TagsState {
                    status: RequestStatus::Success,
                    tags,
                },
            );
        }
        Err(_) => {
            store.set(
                TagsState::PATH,
                TagsState {
                    status: RequestStatus::Failure,
                    tags: Vec::new(),
                },
            );
        }
    }
}
