use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use lumin_types::api::Claims;

use crate::auth::{AppState, SESSION_COOKIE};

/// Authorization failures redirect rather than render an error: anonymous
/// actors go to the login page, authenticated non-moderators back to their
/// dashboard.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match claims_from_request(&req, &state.jwt_secret) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

pub async fn require_moderator(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match claims_from_request(&req, &state.jwt_secret) {
        Some(claims) if claims.moderator => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Some(_) => Redirect::to("/dashboard").into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

/// Session token from the Authorization header or the session cookie; the
/// cookie is how browser sessions arrive, the header is for API clients.
fn claims_from_request(req: &Request, secret: &str) -> Option<Claims> {
    let token = bearer_token(req).or_else(|| cookie_token(req))?;

    decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_token(req: &Request) -> Option<String> {
    let cookies = req.headers().get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .map(str::to_string)
}
