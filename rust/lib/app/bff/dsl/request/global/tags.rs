//! Tag requests.

use flux_derive::request;

/// Load the popular tags for the sidebar.
#[request("tags/load")]
pub struct LoadTagsReq;
