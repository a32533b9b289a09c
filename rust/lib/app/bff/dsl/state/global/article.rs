//! Single-article state — stored at `article/state`.

use conduit_client::{Article, FieldErrors};
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// The article currently open on the article page.
#[state("article/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleState {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<Article>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ArticleState {
    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            article: None,
            errors: None,
        }
    }
}
