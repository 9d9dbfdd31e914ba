use axum::{
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

#[derive(Debug, Clone, Copy)]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

/// One-shot notification delivered as a short-lived cookie on the redirect
/// that follows a mutation; the template layer reads and clears it on the
/// next page load. Base64-wrapped so the message never needs cookie escaping.
pub fn flash_redirect(level: FlashLevel, message: &str, to: &str) -> Response {
    let payload = B64.encode(
        serde_json::json!({ "level": level.as_str(), "message": message }).to_string(),
    );
    let cookie = format!("flash={payload}; Path=/; Max-Age=60");
    ([(SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}
