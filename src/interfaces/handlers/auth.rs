use actix_web::{get, post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::account::{LoginAccount, NewAccount};
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/register")]
#[instrument(name = "register", skip_all)]
pub async fn register(
    state: web::Data<AppState>,
    account: web::Json<NewAccount>,
) -> impl Responder {
    match state.auth_handler.register(account.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
#[instrument(name = "login", skip_all)]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginAccount>,
) -> impl Responder {
    match state.auth_handler.login(credentials.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("/me")]
#[instrument(name = "me", skip_all, fields(account_id = %claims.0.sub))]
pub async fn me(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    match state.auth_handler.current_account(&claims.0).await {
        Ok(account) => HttpResponse::Ok().json(account),
        Err(e) => e.to_http_response(),
    }
}
