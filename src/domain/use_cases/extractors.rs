use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    entities::token::Claims,
    errors::AuthError,
    AppState,
};

/// Decoded claims of the bearer token on the request.
/// Rejects with 401 when the header is missing or the token does not verify.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(extract_claims(req).map(AuthClaims).map_err(Into::into))
    }
}

/// Returns the raw token from `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn extract_claims(req: &HttpRequest) -> Result<Claims, AuthError> {
    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AuthError::Storage("Application state not configured".into()))?;

    Ok(state.auth_handler.token_service.decode_jwt(token)?.claims)
}
