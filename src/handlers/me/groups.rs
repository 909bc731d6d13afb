// handlers/me/groups.rs - /api/me/groups

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Group, NewGroup};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Groups the caller belongs to.
pub async fn my_groups(State(state): State<AppState>, identity: Identity) -> ApiResult<Vec<Group>> {
    let groups = state.store.list_groups_for(&identity.username).await?;
    Ok(ApiResponse::success(groups))
}

pub async fn group_create(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<CreateGroupRequest>,
) -> ApiResult<Group> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request(Message::GroupNameRequired));
    }

    let group = state
        .store
        .create_group(NewGroup {
            name: name.to_string(),
            description: body.description.unwrap_or_default(),
            owner: identity.username,
        })
        .await?;

    tracing::info!("Group '{}' created by '{}'", group.name, group.owner);
    Ok(ApiResponse::created(group))
}

pub async fn group_join(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Group> {
    if state.store.get_group(id).await?.is_none() {
        return Err(ApiError::not_found(Message::GroupNotFound));
    }

    match state.store.add_member(id, &identity.username).await {
        Ok(()) => {}
        Err(DatabaseError::Conflict(_)) => return Err(ApiError::conflict(Message::AlreadyMember)),
        Err(e) => return Err(e.into()),
    }

    let group = state
        .store
        .get_group(id)
        .await?
        .ok_or(ApiError::not_found(Message::GroupNotFound))?;
    Ok(ApiResponse::success(group))
}

pub async fn group_leave(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Group> {
    let group = state
        .store
        .get_group(id)
        .await?
        .ok_or(ApiError::not_found(Message::GroupNotFound))?;

    if group.owner == identity.username {
        return Err(ApiError::bad_request(Message::OwnerCannotLeave));
    }

    if !state.store.remove_member(id, &identity.username).await? {
        return Err(ApiError::not_found(Message::NotMember));
    }

    let group = state
        .store
        .get_group(id)
        .await?
        .ok_or(ApiError::not_found(Message::GroupNotFound))?;
    Ok(ApiResponse::success(group))
}
