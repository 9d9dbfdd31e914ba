use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ShowcaseStatus, Tier};

// -- JWT Claims --

/// JWT claims shared between the api middleware and the handlers. The
/// `moderator` flag is the capability check for the review endpoints;
/// everything else about sessions lives in the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub moderator: bool,
    pub exp: usize,
}

// -- Forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowcaseForm {
    pub title: String,
    pub body_md: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
}

/// Approve form. `coins` stays a raw string so a malformed award degrades
/// to zero instead of failing extraction.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApproveForm {
    #[serde(default)]
    pub coins: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RejectForm {
    #[serde(default)]
    pub reason: Option<String>,
}

// -- Responses --

/// Validation failure body: HTTP 200, field-attached messages, submitted
/// values echoed back so the form can re-render with them.
#[derive(Debug, Serialize)]
pub struct FormErrors {
    pub errors: BTreeMap<String, String>,
    pub values: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub coins: u64,
    pub tier: Tier,
    pub joined: String,
}

#[derive(Debug, Serialize)]
pub struct ShowcaseSummary {
    pub id: Uuid,
    pub title: String,
    pub status: ShowcaseStatus,
    pub coins_award: u64,
    pub admin_note: String,
    pub created_at: String,
    pub approved_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: ProfileResponse,
    pub showcases: Vec<ShowcaseSummary>,
}

#[derive(Debug, Serialize)]
pub struct ShowcaseDetail {
    pub id: Uuid,
    pub owner_username: String,
    pub title: String,
    pub body_md: String,
    pub body_html: String,
    pub link: Option<String>,
    pub screenshot_url: Option<String>,
    pub status: ShowcaseStatus,
    pub coins_award: u64,
    pub admin_note: String,
    pub created_at: String,
    pub approved_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub coins: u64,
    pub tier: Tier,
    pub joined: String,
}

#[derive(Debug, Serialize)]
pub struct PendingShowcase {
    pub id: Uuid,
    pub owner_username: String,
    pub title: String,
    pub body_md: String,
    pub link: Option<String>,
    pub screenshot_url: Option<String>,
    pub created_at: String,
}
