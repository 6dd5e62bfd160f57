use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::session::SessionStore;

pub const LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_ROUTE: &str = "/";

/// Extracting `AdminSession` is the route guard: every protected handler
/// declares it, and unauthenticated requests are redirected to the login
/// route before the handler body runs.
///
/// The check is synchronous against the locally persisted token. A token the
/// backend has since rejected is only discovered by the first API call, which
/// surfaces as an in-page error rather than an automatic logout.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_ROUTE).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Arc<SessionStore>>()
            .ok_or(AuthRedirect)?;

        match session.token() {
            Some(token) => Ok(AdminSession { token }),
            None => Err(AuthRedirect),
        }
    }
}

#[cfg(test)]
mod tests;
