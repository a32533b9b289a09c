//! Comment requests.

use flux_derive::request;

/// Load all comments for an article.
#[request("comments/load")]
pub struct LoadCommentsReq {
    pub slug: String,
}

/// Post a comment. Inserted optimistically, reconciled on response.
#[request("comments/add")]
pub struct AddCommentReq {
    pub slug: String,
    pub body: String,
}

/// Delete the current user's comment.
#[request("comments/delete")]
pub struct DeleteCommentReq {
    pub slug: String,
    pub id: i64,
}
