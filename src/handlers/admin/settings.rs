// handlers/admin/settings.rs - GET/PUT /api/admin/config

use axum::extract::State;

use crate::database::models::SiteSettings;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

pub async fn settings_get(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    let settings = state.store.get_settings().await?;
    Ok(ApiResponse::success(settings))
}

/// Replaces the whole settings row.
pub async fn settings_put(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(mut settings): JsonBody<SiteSettings>,
) -> ApiResult<SiteSettings> {
    settings.site_name = settings.site_name.trim().to_string();
    if settings.site_name.is_empty() {
        return Err(ApiError::bad_request(Message::SiteNameRequired));
    }
    settings.notice = settings
        .notice
        .map(|notice| notice.trim().to_string())
        .filter(|notice| !notice.is_empty());

    let saved = state.store.save_settings(settings).await?;
    tracing::info!(
        "Site settings updated by '{}' (registration_open={})",
        identity.username,
        saved.registration_open
    );
    Ok(ApiResponse::success(saved))
}
