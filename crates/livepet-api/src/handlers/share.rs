//! Owner share management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use livepet_core::types::{PageResponse, PetId, ShareId};
use livepet_entity::access_log::AccessLogEntry;
use livepet_service::share::{CreatedShare, ShareSummary};

use crate::dto::request::CreateShareRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{ApiJson, AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/pets/{pet_id}/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pet_id): Path<String>,
    ApiJson(req): ApiJson<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedShare>>), ApiError> {
    let pet_id: PetId = parse_id(&pet_id)?;
    let created = state.share_service.create_share(&auth, pet_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ShareSummary>>>, ApiError> {
    let page = state
        .share_service
        .list_shares(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/shares/{id}
pub async fn get_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShareSummary>>, ApiError> {
    let id: ShareId = parse_id(&id)?;
    let share = state.share_service.get_share(&auth, id).await?;
    Ok(Json(ApiResponse::ok(share)))
}

/// POST /api/shares/{id}/revoke
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShareSummary>>, ApiError> {
    let id: ShareId = parse_id(&id)?;
    let share = state.share_service.revoke(&auth, id).await?;
    Ok(Json(ApiResponse::ok(share)))
}

/// GET /api/shares/{id}/access-logs
pub async fn access_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AccessLogEntry>>>, ApiError> {
    let id: ShareId = parse_id(&id)?;
    let logs = state.share_service.access_logs(&auth, id).await?;
    Ok(Json(ApiResponse::ok(logs)))
}
