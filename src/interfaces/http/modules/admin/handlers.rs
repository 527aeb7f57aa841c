//! Admin HTTP handlers
//!
//! Every route here sits behind the admin middleware, and the application
//! services re-verify the role from the passed identity anyway.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::{BookingAdmissionService, QueryFacade, SpotRegistryService};
use crate::domain::lot::NewParkingLot;
use crate::domain::spot::{NewParkingSpot, Orientation, SpotStatus, SpotUpdate};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::dashboard::{LotDto, SpotDto};

use super::dto::*;

/// Application state for admin handlers.
#[derive(Clone)]
pub struct AdminAppState {
    pub admission: Arc<BookingAdmissionService>,
    pub registry: Arc<SpotRegistryService>,
    pub queries: Arc<QueryFacade>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate stats", body = ApiResponse<DashboardStatsDto>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn get_dashboard_stats(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<DashboardStatsDto>>,
    (StatusCode, Json<ApiResponse<DashboardStatsDto>>),
> {
    let stats = state
        .queries
        .get_dashboard_stats(&user.identity())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings with user and spot details", body = ApiResponse<Vec<BookingRecordDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn get_all_bookings(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<Vec<BookingRecordDto>>>,
    (StatusCode, Json<ApiResponse<Vec<BookingRecordDto>>>),
> {
    let records = state
        .queries
        .get_all_bookings(&user.identity())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        records.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/bookings/{booking_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_any_booking(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .admission
        .cancel_booking(&user.identity(), booking_id, true)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/lots",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateLotRequest,
    responses(
        (status = 201, description = "Lot created", body = ApiResponse<LotDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_lot(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateLotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LotDto>>), (StatusCode, Json<ApiResponse<LotDto>>)> {
    let lot = state
        .registry
        .create_lot(
            &user.identity(),
            NewParkingLot {
                name: request.name,
                location: request.location,
                grid_rows: request.grid_rows,
                grid_cols: request.grid_cols,
            },
        )
        .await
        .map_err(domain_error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lot.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/lots/{lot_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("lot_id" = i32, Path, description = "Parking lot ID")),
    responses(
        (status = 200, description = "Lot and its spots", body = ApiResponse<LotWithSpotsDto>),
        (status = 404, description = "Lot not found")
    )
)]
pub async fn get_lot_for_management(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(lot_id): Path<i32>,
) -> Result<Json<ApiResponse<LotWithSpotsDto>>, (StatusCode, Json<ApiResponse<LotWithSpotsDto>>)> {
    let (lot, spots) = state
        .queries
        .get_lot_for_management(&user.identity(), lot_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(LotWithSpotsDto {
        lot: lot.into(),
        spots: spots.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/spots",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateSpotRequest,
    responses(
        (status = 201, description = "Spot created", body = ApiResponse<SpotDto>),
        (status = 400, description = "Duplicate number or grid position"),
        (status = 404, description = "Lot not found")
    )
)]
pub async fn create_spot(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateSpotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SpotDto>>), (StatusCode, Json<ApiResponse<SpotDto>>)> {
    let spot = state
        .registry
        .create_spot(
            &user.identity(),
            NewParkingSpot {
                spot_number: request.spot_number,
                parking_lot_id: request.parking_lot_id,
                grid_row: request.grid_row,
                grid_col: request.grid_col,
                orientation: request
                    .orientation
                    .as_deref()
                    .map(Orientation::from_str)
                    .unwrap_or(Orientation::North),
                status: request
                    .status
                    .as_deref()
                    .map(SpotStatus::from_str)
                    .unwrap_or(SpotStatus::Available),
            },
        )
        .await
        .map_err(domain_error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(spot.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/spots/{spot_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("spot_id" = i32, Path, description = "Parking spot ID")),
    request_body = UpdateSpotRequest,
    responses(
        (status = 200, description = "Spot updated", body = ApiResponse<SpotDto>),
        (status = 400, description = "Duplicate number or grid position"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn update_spot(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(spot_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateSpotRequest>,
) -> Result<Json<ApiResponse<SpotDto>>, (StatusCode, Json<ApiResponse<SpotDto>>)> {
    let spot = state
        .registry
        .update_spot(
            &user.identity(),
            spot_id,
            SpotUpdate {
                spot_number: request.spot_number,
                grid_row: request.grid_row,
                grid_col: request.grid_col,
                orientation: Orientation::from_str(&request.orientation),
                status: SpotStatus::from_str(&request.status),
            },
        )
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/spots/{spot_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("spot_id" = i32, Path, description = "Parking spot ID")),
    responses(
        (status = 200, description = "Spot deleted"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn delete_spot(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(spot_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .registry
        .delete_spot(&user.identity(), spot_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}
