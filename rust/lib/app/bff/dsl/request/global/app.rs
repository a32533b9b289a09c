//! App lifecycle requests.

use flux_derive::request;

/// Boot the app — restore a persisted token, fetch the current user,
/// then mark the app loaded.
#[request("app/load")]
pub struct AppLoadReq {
    pub token: Option<String>,
}

/// Clear `redirect_to` once the consumer has navigated.
#[request("app/clear-redirect")]
pub struct ClearRedirectReq;
