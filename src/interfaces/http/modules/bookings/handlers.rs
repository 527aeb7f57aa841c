//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::{BookingAdmissionService, QueryFacade};
use crate::interfaces::http::common::{domain_error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub admission: Arc<BookingAdmissionService>,
    pub queries: Arc<QueryFacade>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid time range or spot unavailable"),
        (status = 404, description = "Spot not found"),
        (status = 409, description = "Spot already booked for the selected time")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), (StatusCode, Json<ApiResponse<BookingDto>>)>
{
    let booking = state
        .admission
        .create_booking(
            &user.identity(),
            request.parking_spot_id,
            request.start_time,
            request.end_time,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(booking.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(UserBookingsParams),
    responses(
        (status = 200, description = "The caller's bookings", body = ApiResponse<Vec<BookingWithSpotDto>>)
    )
)]
pub async fn list_my_bookings(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<UserBookingsParams>,
) -> Result<
    Json<ApiResponse<Vec<BookingWithSpotDto>>>,
    (StatusCode, Json<ApiResponse<Vec<BookingWithSpotDto>>>),
> {
    let rows = state
        .queries
        .get_user_bookings(&user.identity(), params.include_history)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 400, description = "Booking has already started"),
        (status = 404, description = "No such booking owned by the caller")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .admission
        .cancel_booking(&user.identity(), booking_id, false)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}
