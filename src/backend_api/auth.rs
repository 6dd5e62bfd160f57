use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminInfo {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

/// OAuth2 password flow: form-encoded credentials in, bearer token out.
/// The token is opaque to the console and never decoded locally.
pub async fn login(
    client: &BackendClient,
    username: &str,
    password: &str,
) -> Result<TokenResponse, ApiError> {
    client
        .post_form("/token", &LoginForm { username, password }, "admin login")
        .await
}

pub async fn me(client: &BackendClient) -> Result<AdminInfo, ApiError> {
    client.get("/me", "current admin info").await
}
