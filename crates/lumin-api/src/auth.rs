use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info};
use uuid::Uuid;

use lumin_db::Database;
use lumin_types::api::{Claims, LoginForm, RegisterForm};

use crate::validate::{self, FieldErrors};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Usernames granted the moderator capability (LUMIN_MODERATORS).
    pub moderators: Vec<String>,
}

pub const SESSION_COOKIE: &str = "token";

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, StatusCode> {
    let mut errors = validate::register_form(&form);

    if errors.is_empty() {
        let db = state.clone();
        let username = form.username.clone();
        let taken = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
            .await
            .map_err(join_error)?
            .map_err(db_error)?
            .is_some();
        if taken {
            errors.insert("username".into(), "Username is already taken.".into());
        }
    }

    if !errors.is_empty() {
        return Ok(register_rejection(errors, &form));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(form.password.as_bytes(), &salt)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .to_string();

    let user_id = Uuid::new_v4();
    let profile_id = Uuid::new_v4();
    let joined = chrono::Utc::now().to_rfc3339();
    let moderator = state.moderators.iter().any(|m| m == &form.username);

    {
        let db = state.clone();
        let username = form.username.clone();
        let email = form.email.clone();
        tokio::task::spawn_blocking(move || {
            db.db.create_user_with_profile(
                &user_id.to_string(),
                &username,
                &email,
                &password_hash,
                moderator,
                &profile_id.to_string(),
                &joined,
            )
        })
        .await
        .map_err(join_error)?
        .map_err(db_error)?;
    }

    info!(username = %form.username, moderator, "registered new account");

    let token = issue_token(&state.jwt_secret, user_id, &form.username, moderator)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(session_redirect(&token, "/dashboard"))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    let db = state.clone();
    let username = form.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let Some(user) = user else {
        return Ok(login_rejection(&form));
    };

    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Ok(login_rejection(&form));
    }

    let user_id: Uuid = user.id.parse().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let token = issue_token(&state.jwt_secret, user_id, &user.username, user.moderator)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(session_redirect(&token, "/dashboard"))
}

pub async fn logout() -> Response {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    ([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    moderator: bool,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        moderator,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Establish the session and send the actor to their dashboard.
fn session_redirect(token: &str, to: &str) -> Response {
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    ([(SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

fn register_rejection(errors: FieldErrors, form: &RegisterForm) -> Response {
    // Passwords are never echoed back.
    validate::form_rejection(
        errors,
        serde_json::json!({
            "username": form.username,
            "email": form.email,
        }),
    )
}

fn login_rejection(form: &LoginForm) -> Response {
    let mut errors = FieldErrors::new();
    errors.insert("form".into(), "Invalid username or password.".into());
    validate::form_rejection(errors, serde_json::json!({ "username": form.username }))
}

fn join_error(e: tokio::task::JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn db_error(e: anyhow::Error) -> StatusCode {
    error!("database error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}
