// handlers/public/groups.rs - GET /api/public/groups

use axum::extract::State;

use crate::database::models::Group;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn group_list(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    let groups = state.store.list_groups().await?;
    Ok(ApiResponse::success(groups))
}
