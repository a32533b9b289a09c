//! Editor form state — stored at `editor/state`.

use conduit_client::{Article, ArticleDraft, FieldErrors};
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// The article editor form.
///
/// `slug` decides submit semantics: `Some` updates that article,
/// `None` creates a new one.
#[state("editor/state")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl EditorState {
    pub fn initial() -> Self {
        Self {
            slug: None,
            title: String::new(),
            description: String::new(),
            body: String::new(),
            tag_list: Vec::new(),
            status: RequestStatus::Idle,
            errors: None,
        }
    }

    /// Prefill the form from an existing article (edit mode).
    pub fn from_article(article: &Article) -> Self {
        Self {
            slug: Some(article.slug.clone()),
            title: article.title.clone(),
            description: article.description.clone(),
            body: article.body.clone(),
            tag_list: article.tag_list.clone(),
            status: RequestStatus::Success,
            errors: None,
        }
    }

    /// The submit payload built from the current form fields.
    pub fn draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
            tag_list: self.tag_list.clone(),
        }
    }
}
