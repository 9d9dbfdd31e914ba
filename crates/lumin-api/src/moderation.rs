use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use lumin_db::ModerationError;
use lumin_db::models::ShowcaseRow;
use lumin_types::api::{ApproveForm, Claims, PendingShowcase, RejectForm};

use crate::auth::AppState;
use crate::flash::{FlashLevel, flash_redirect};

const QUEUE_PATH: &str = "/moderation/review";

pub async fn review_queue(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let pending = load_queue(&state).await?;
    Ok(Json(serde_json::json!({ "pending": pending })))
}

pub async fn approve_showcase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<ApproveForm>,
) -> Result<Response, StatusCode> {
    // A malformed award is not a request failure; it degrades to zero.
    // Parsed as i64 so anything the coins column cannot hold (negative or
    // beyond i64::MAX) counts as malformed too.
    let coins = form
        .coins
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(0) as u64;

    let db = state.clone();
    let showcase_id = id.to_string();
    let result = tokio::task::spawn_blocking(move || {
        db.db
            .approve_showcase(&showcase_id, coins, &chrono::Utc::now().to_rfc3339())
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match result {
        Ok(()) => {
            info!(moderator = %claims.username, showcase = %id, coins, "showcase approved");
            Ok(flash_redirect(
                FlashLevel::Success,
                &format!("Showcase approved and {coins} coins awarded."),
                QUEUE_PATH,
            ))
        }
        Err(ModerationError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(ModerationError::AlreadyDecided) => {
            warn!(moderator = %claims.username, showcase = %id, "approve on a decided showcase");
            Ok(flash_redirect(
                FlashLevel::Error,
                "Showcase was already decided; no coins awarded.",
                QUEUE_PATH,
            ))
        }
        Err(e) => {
            error!("approve failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn reject_showcase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<RejectForm>,
) -> Result<Response, StatusCode> {
    let reason = form.reason.unwrap_or_default();
    let reason = reason.trim();

    if reason.is_empty() {
        // Error plus the queue itself, so the page re-renders in place.
        let pending = load_queue(&state).await?;
        return Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "errors": { "reason": "Reason is required." },
                "pending": pending,
            })),
        )
            .into_response());
    }

    let db = state.clone();
    let showcase_id = id.to_string();
    let note = reason.to_string();
    let result =
        tokio::task::spawn_blocking(move || db.db.reject_showcase(&showcase_id, &note))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    match result {
        Ok(()) => {
            info!(moderator = %claims.username, showcase = %id, "showcase rejected");
            Ok(flash_redirect(
                FlashLevel::Warning,
                &format!("Showcase rejected with reason: {reason}"),
                QUEUE_PATH,
            ))
        }
        Err(ModerationError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(ModerationError::AlreadyDecided) => Ok(flash_redirect(
            FlashLevel::Error,
            "Showcase was already decided.",
            QUEUE_PATH,
        )),
        Err(e) => {
            error!("reject failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn load_queue(state: &AppState) -> Result<Vec<PendingShowcase>, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.pending_showcases())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("review queue load failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(rows.into_iter().map(pending_entry).collect())
}

fn pending_entry(row: ShowcaseRow) -> PendingShowcase {
    PendingShowcase {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt showcase id '{}': {}", row.id, e);
            Uuid::default()
        }),
        owner_username: row.owner_username,
        title: row.title,
        body_md: row.body_md,
        link: row.link,
        screenshot_url: row.screenshot_url,
        created_at: row.created_at,
    }
}
