//! Auth requests.

use flux_derive::request;

/// Login with email + password.
#[request("auth/login")]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

/// Register a new account.
#[request("auth/register")]
pub struct RegisterReq {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Re-fetch the current user for the installed token.
#[request("auth/load-user")]
pub struct LoadUserReq;

/// Update the current user's settings. Unset fields are left untouched.
#[request("auth/update-user")]
#[derive(Default)]
pub struct UpdateUserReq {
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

/// Logout — clear the session.
#[request("auth/logout")]
pub struct LogoutReq;
