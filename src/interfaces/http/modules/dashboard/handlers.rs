//! Dashboard HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::QueryFacade;
use crate::interfaces::http::common::{domain_error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardAppState {
    pub queries: Arc<QueryFacade>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/lots",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All parking lots", body = ApiResponse<Vec<LotDto>>)
    )
)]
pub async fn list_lots(
    State(state): State<DashboardAppState>,
) -> Result<Json<ApiResponse<Vec<LotDto>>>, (StatusCode, Json<ApiResponse<Vec<LotDto>>>)> {
    let lots = state
        .queries
        .get_all_lots()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        lots.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/lots/{lot_id}",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(("lot_id" = i32, Path, description = "Parking lot ID")),
    responses(
        (status = 200, description = "Lot, grid spots and the caller's upcoming bookings", body = ApiResponse<UserDashboardResponse>),
        (status = 404, description = "Lot not found")
    )
)]
pub async fn get_user_dashboard(
    State(state): State<DashboardAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(lot_id): Path<i32>,
) -> Result<
    Json<ApiResponse<UserDashboardResponse>>,
    (StatusCode, Json<ApiResponse<UserDashboardResponse>>),
> {
    let dashboard = state
        .queries
        .get_user_dashboard(&user.identity(), lot_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(UserDashboardResponse {
        lot: dashboard.lot.into(),
        spots: dashboard.spots.into_iter().map(Into::into).collect(),
        user_bookings: dashboard
            .user_bookings
            .into_iter()
            .map(Into::into)
            .collect(),
    })))
}
