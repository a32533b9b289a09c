//! Article list state — stored at `articles/list`.
//!
//! One slice serves the home page tabs, the tag filter, and the two
//! profile tabs (my articles / favorited). The active filter set lives
//! in the slice so a reload re-queries the same thing.

use conduit_client::Article;
use flux_derive::state;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// Which home feed is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListTab {
    /// Articles by followed authors (`/articles/feed`).
    Feed,
    /// The global feed (`/articles`).
    All,
}

/// Paginated article list plus the filters that produced it.
#[state("articles/list")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListState {
    pub status: RequestStatus,
    pub articles: Vec<Article>,
    pub articles_count: u64,
    pub current_page: u64,
    pub articles_per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<ListTab>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited: Option<String>,
}

impl ArticleListState {
    pub fn initial() -> Self {
        Self {
            status: RequestStatus::Idle,
            articles: Vec::new(),
            articles_count: 0,
            current_page: 0,
            articles_per_page: 10,
            tab: None,
            tag: None,
            author: None,
            favorited: None,
        }
    }

    /// Total pages for the current filter set.
    pub fn page_count(&self) -> u64 {
        if self.articles_per_page == 0 {
            return 0;
        }
        self.articles_count.div_ceil(self.articles_per_page)
    }

    /// Pagination is only rendered when there is more than one page.
    pub fn show_pagination(&self) -> bool {
        self.articles_count > self.articles_per_page
    }
}
