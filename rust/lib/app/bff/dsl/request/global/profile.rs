//! Profile requests.

use flux_derive::request;

/// Load a user's public profile.
#[request("profile/load")]
pub struct LoadProfileReq {
    pub username: String,
}

/// Follow the profiled user.
#[request("profile/follow")]
pub struct FollowReq {
    pub username: String,
}

/// Unfollow the profiled user.
#[request("profile/unfollow")]
pub struct UnfollowReq {
    pub username: String,
}

/// Leaving the profile page — reset profile and article list.
#[request("profile/unload")]
pub struct ProfileUnloadReq;
