use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    Booking, BookingFilter, CancelBookingRequest, CreateBookingRequest, RescheduleRequest,
    StatusUpdateRequest,
};
use crate::services::BookingService;

#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub service: Arc<BookingService>,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn validate_booking(
    State(state): State<BookingState>,
    Path(salon_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let proposal = request.into_proposal(salon_id);
    let validated = state.service.validate_booking(&proposal).await?;

    Ok(Json(json!({
        "valid": true,
        "booking": validated
    })))
}

// ==============================================================================
// PROTECTED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<BookingState>,
    Extension(user): Extension<User>,
    Path(salon_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    info!("User {} booking staff {} in salon {}", user.id, request.staff_id, salon_id);

    let booking = state.service.create_booking(request.into_proposal(salon_id)).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<BookingState>,
    Path(salon_id): Path<Uuid>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Value>, AppError> {
    let bookings = state.service.list_bookings(salon_id, &filter).await?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len()
    })))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<BookingState>,
    Path((salon_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.service.get_booking(salon_id, booking_id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn reschedule_booking(
    State(state): State<BookingState>,
    Extension(user): Extension<User>,
    Path((salon_id, booking_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Booking>, AppError> {
    info!("User {} rescheduling booking {}", user.id, booking_id);

    let booking = state
        .service
        .reschedule_booking(salon_id, booking_id, request.start_time)
        .await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<BookingState>,
    Extension(user): Extension<User>,
    Path((salon_id, booking_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Booking>, AppError> {
    info!("User {} setting booking {} to {}", user.id, booking_id, request.status);

    let booking = state
        .service
        .update_status(salon_id, booking_id, request.status)
        .await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<BookingState>,
    Extension(user): Extension<User>,
    Path((salon_id, booking_id)): Path<(Uuid, Uuid)>,
    request: Option<Json<CancelBookingRequest>>,
) -> Result<Json<Booking>, AppError> {
    info!("User {} cancelling booking {}", user.id, booking_id);

    let notes = request.and_then(|Json(request)| request.notes);
    let booking = state
        .service
        .cancel_booking(salon_id, booking_id, notes)
        .await?;
    Ok(Json(booking))
}
