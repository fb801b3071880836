//! HTTP Basic authentication against the user directory.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ptrack_core::user::model::Credentials;
use ptrack_core::Identity;

use crate::error::ApiError;
use crate::state::{run_blocking, AppState};

/// The authenticated caller of a request.
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credentials = basic_credentials(&parts.headers).ok_or_else(ApiError::unauthenticated)?;
        let directory = state.directory.clone();
        let identity = run_blocking(move || directory.authenticate(&credentials)).await?;
        Ok(Self(identity))
    }
}

/// Decode `Authorization: Basic <base64(username:password)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
