use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use pulldown_cmark::{Parser, html};
use tracing::{error, warn};
use uuid::Uuid;

use lumin_db::models::ShowcaseRow;
use lumin_types::api::{
    Claims, DashboardResponse, LeaderboardEntry, ProfileResponse, ShowcaseDetail, ShowcaseForm,
    ShowcaseSummary,
};
use lumin_types::{ShowcaseStatus, Tier};

use crate::auth::AppState;
use crate::flash::{FlashLevel, flash_redirect};
use crate::validate;

const LEADERBOARD_SIZE: u32 = 10;

enum Submit {
    Created,
    NoActor,
    WrongDomain,
}

pub async fn add_showcase(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<ShowcaseForm>,
) -> Result<Response, StatusCode> {
    let mut errors = validate::showcase_form(&form);

    if !errors.is_empty() {
        let values = serde_json::to_value(&form).unwrap_or_default();
        return Ok(validate::form_rejection(errors, values));
    }

    let db = state.clone();
    let actor_id = claims.sub.to_string();
    let submitted = form.clone();
    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<Submit> {
        let Some(user) = db.db.get_user_by_id(&actor_id)? else {
            return Ok(Submit::NoActor);
        };
        // Domain restriction applies to the actor's account email, not to
        // anything the form supplies.
        if !validate::is_company_email(&user.email) {
            return Ok(Submit::WrongDomain);
        }
        let Some(profile) = db.db.get_profile_by_user(&user.id)? else {
            return Ok(Submit::NoActor);
        };
        db.db.insert_showcase(
            &Uuid::new_v4().to_string(),
            &profile.id,
            submitted.title.trim(),
            &submitted.body_md,
            submitted.link.as_deref().filter(|s| !s.is_empty()),
            submitted.screenshot_url.as_deref().filter(|s| !s.is_empty()),
            &chrono::Utc::now().to_rfc3339(),
        )?;
        Ok(Submit::Created)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("showcase insert failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match outcome {
        Submit::Created => Ok(flash_redirect(
            FlashLevel::Success,
            "Showcase submitted for review.",
            "/dashboard",
        )),
        Submit::NoActor => Ok(Redirect::to("/login").into_response()),
        Submit::WrongDomain => {
            errors.insert("form".into(), "Email must be @paycorp.local domain".into());
            let values = serde_json::to_value(&form).unwrap_or_default();
            Ok(validate::form_rejection(errors, values))
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardResponse>, Response> {
    actor_overview(state, claims).await
}

/// Same projection as the dashboard; the template layer renders it
/// differently.
pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardResponse>, Response> {
    actor_overview(state, claims).await
}

async fn actor_overview(
    state: AppState,
    claims: Claims,
) -> Result<Json<DashboardResponse>, Response> {
    let db = state.clone();
    let actor_id = claims.sub.to_string();

    let loaded = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let Some(user) = db.db.get_user_by_id(&actor_id)? else {
            return Ok(None);
        };
        let Some(profile) = db.db.get_profile_by_user(&user.id)? else {
            return Ok(None);
        };
        let rows = db.db.showcases_for_owner(&profile.id)?;
        Ok(Some((user, profile, rows)))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })?
    .map_err(|e| {
        error!("dashboard load failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })?;

    // A valid token for a vanished account gets a fresh login, not a 500.
    let Some((user, profile, rows)) = loaded else {
        return Err(Redirect::to("/login").into_response());
    };

    Ok(Json(DashboardResponse {
        profile: ProfileResponse {
            username: user.username,
            coins: profile.coins as u64,
            tier: tier_from_row(&profile.tier),
            joined: profile.joined,
        },
        showcases: rows.into_iter().map(summary).collect(),
    }))
}

pub async fn showcase_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<ShowcaseDetail>, StatusCode> {
    let db = state.clone();
    let showcase_id = id.to_string();
    let row = tokio::task::spawn_blocking(move || db.db.get_showcase(&showcase_id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("showcase load failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let body_html = render_markdown(&row.body_md);

    Ok(Json(ShowcaseDetail {
        id,
        owner_username: row.owner_username,
        title: row.title,
        body_md: row.body_md,
        body_html,
        link: row.link,
        screenshot_url: row.screenshot_url,
        status: ShowcaseStatus::of(row.approved, &row.admin_note),
        coins_award: row.coins_award as u64,
        admin_note: row.admin_note,
        created_at: row.created_at,
        approved_at: row.approved_at,
    }))
}

pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.leaderboard(LEADERBOARD_SIZE))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("leaderboard load failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            rank: i + 1,
            username: row.username,
            coins: row.coins as u64,
            tier: tier_from_row(&row.tier),
            joined: row.joined,
        })
        .collect();

    Ok(Json(entries))
}

fn summary(row: ShowcaseRow) -> ShowcaseSummary {
    ShowcaseSummary {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt showcase id '{}': {}", row.id, e);
            Uuid::default()
        }),
        title: row.title,
        status: ShowcaseStatus::of(row.approved, &row.admin_note),
        coins_award: row.coins_award as u64,
        admin_note: row.admin_note,
        created_at: row.created_at,
        approved_at: row.approved_at,
    }
}

fn tier_from_row(name: &str) -> Tier {
    Tier::from_name(name).unwrap_or_else(|| {
        warn!("Corrupt tier '{}', treating as Explorer", name);
        Tier::Explorer
    })
}

/// Render a showcase body to HTML for the detail view.
fn render_markdown(body_md: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(body_md));
    out
}
