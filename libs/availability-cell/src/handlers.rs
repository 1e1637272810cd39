use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AvailabilityWindow, BookableSlots, CreateWindowRequest, UpdateWindowRequest};
use crate::services::{AvailabilityStore, BookingLedger, SlotResolver};

#[derive(Clone)]
pub struct AvailabilityState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn AvailabilityStore>,
    pub ledger: Arc<dyn BookingLedger>,
}

impl AvailabilityState {
    pub fn resolver(&self) -> SlotResolver {
        SlotResolver::new(self.store.clone(), self.ledger.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_windows(
    State(state): State<AvailabilityState>,
    Path((salon_id, staff_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let windows = state.store.windows_for_staff(salon_id, staff_id).await?;

    Ok(Json(json!({
        "windows": windows,
        "total": windows.len()
    })))
}

#[axum::debug_handler]
pub async fn get_bookable_slots(
    State(state): State<AvailabilityState>,
    Path((salon_id, staff_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<BookableSlots>, AppError> {
    let slots = state
        .resolver()
        .bookable_slots(
            salon_id,
            staff_id,
            query.date,
            query.duration_minutes,
            state.config.slot_granularity_minutes,
        )
        .await?;

    Ok(Json(slots))
}

// ==============================================================================
// PROTECTED HANDLERS (salon owner actions)
// ==============================================================================

#[axum::debug_handler]
pub async fn create_window(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Path((salon_id, staff_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<AvailabilityWindow>), AppError> {
    info!("User {} adding availability for staff {}", user.id, staff_id);

    let window = state.store.create_window(salon_id, staff_id, request).await?;
    Ok((StatusCode::CREATED, Json(window)))
}

#[axum::debug_handler]
pub async fn update_window(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Path((salon_id, staff_id, availability_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(request): Json<UpdateWindowRequest>,
) -> Result<Json<AvailabilityWindow>, AppError> {
    info!("User {} updating availability {}", user.id, availability_id);

    let window = state
        .store
        .update_window(salon_id, staff_id, availability_id, request)
        .await?;
    Ok(Json(window))
}

#[axum::debug_handler]
pub async fn delete_window(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Path((salon_id, staff_id, availability_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!("User {} deleting availability {}", user.id, availability_id);

    state.store.delete_window(salon_id, staff_id, availability_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
