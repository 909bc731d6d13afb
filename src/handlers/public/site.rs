// handlers/public/site.rs - GET /api/public/avatars, GET /api/public/config

use axum::extract::State;

use crate::database::models::{SiteSettings, AVATARS};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn avatar_list() -> ApiResult<&'static [&'static str]> {
    Ok(ApiResponse::success(AVATARS))
}

pub async fn config_get(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    let settings = state.store.get_settings().await?;
    Ok(ApiResponse::success(settings))
}
