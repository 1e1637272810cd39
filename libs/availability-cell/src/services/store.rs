use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AvailabilityError;
use crate::models::{
    AvailabilityWindow, CreateWindowRequest, DayOfWeek, UpdateWindowRequest,
};

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn windows_for_staff(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError>;

    async fn windows_for_day(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        let windows = self.windows_for_staff(salon_id, staff_id).await?;
        Ok(windows.into_iter().filter(|window| window.applies_on(date)).collect())
    }

    async fn get_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<AvailabilityWindow, AvailabilityError>;

    async fn create_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        request: CreateWindowRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError>;

    async fn update_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
        request: UpdateWindowRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError>;

    async fn delete_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<(), AvailabilityError>;
}

/// Checks a window about to be written against the staff member's other
/// windows. Only windows of the same kind conflict; `exclude_id` skips the
/// window being updated.
pub fn validate_window(
    candidate: &CreateWindowRequest,
    existing: &[AvailabilityWindow],
    exclude_id: Option<Uuid>,
) -> Result<DayOfWeek, AvailabilityError> {
    if candidate.start_time >= candidate.end_time {
        return Err(AvailabilityError::InvalidTimeRange);
    }

    let day_of_week = DayOfWeek::new(candidate.day_of_week)?;

    if let Some(date) = candidate.specific_date {
        if DayOfWeek::of(date) != day_of_week {
            return Err(AvailabilityError::SpecificDateMismatch {
                date,
                day_of_week: day_of_week.value(),
            });
        }
    }

    let conflict = existing.iter().find(|window| {
        Some(window.id) != exclude_id
            && window.kind == candidate.kind
            && window.shares_dates_with(day_of_week, candidate.specific_date)
            && candidate.start_time < window.end_time
            && window.start_time < candidate.end_time
    });

    if let Some(window) = conflict {
        warn!("Window {} overlaps requested {:?} window", window.id, candidate.kind);
        return Err(AvailabilityError::OverlappingWindow { existing_id: window.id });
    }

    Ok(day_of_week)
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAvailabilityStore {
    windows: Arc<RwLock<HashMap<Uuid, AvailabilityWindow>>>,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn staff_windows(
    windows: &HashMap<Uuid, AvailabilityWindow>,
    salon_id: Uuid,
    staff_id: Uuid,
) -> Vec<AvailabilityWindow> {
    let mut result: Vec<AvailabilityWindow> = windows
        .values()
        .filter(|window| window.salon_id == salon_id && window.staff_id == staff_id)
        .cloned()
        .collect();
    result.sort_by_key(|window| (window.day_of_week, window.start_time));
    result
}

#[async_trait]
impl AvailabilityStore for InMemoryAvailabilityStore {
    async fn windows_for_staff(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        let windows = self.windows.read().await;
        Ok(staff_windows(&windows, salon_id, staff_id))
    }

    async fn get_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        let windows = self.windows.read().await;
        windows
            .get(&window_id)
            .filter(|window| window.salon_id == salon_id && window.staff_id == staff_id)
            .cloned()
            .ok_or(AvailabilityError::NotFound)
    }

    async fn create_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        request: CreateWindowRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Creating {:?} window for staff {} in salon {}", request.kind, staff_id, salon_id);

        let mut windows = self.windows.write().await;
        let existing = staff_windows(&windows, salon_id, staff_id);
        let day_of_week = validate_window(&request, &existing, None)?;

        let now = Utc::now();
        let window = AvailabilityWindow {
            id: Uuid::new_v4(),
            salon_id,
            staff_id,
            day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
            kind: request.kind,
            specific_date: request.specific_date,
            created_at: now,
            updated_at: now,
        };
        windows.insert(window.id, window.clone());

        info!("Window {} created for staff {}", window.id, staff_id);
        Ok(window)
    }

    async fn update_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
        request: UpdateWindowRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        let mut windows = self.windows.write().await;
        let current = windows
            .get(&window_id)
            .filter(|window| window.salon_id == salon_id && window.staff_id == staff_id)
            .cloned()
            .ok_or(AvailabilityError::NotFound)?;

        let candidate = request.apply_to(&current);
        let existing = staff_windows(&windows, salon_id, staff_id);
        validate_window(&candidate, &existing, Some(window_id))?;

        let updated = AvailabilityWindow {
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            kind: candidate.kind,
            updated_at: Utc::now(),
            ..current
        };
        windows.insert(window_id, updated.clone());

        info!("Window {} updated", window_id);
        Ok(updated)
    }

    async fn delete_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<(), AvailabilityError> {
        let mut windows = self.windows.write().await;
        let owned = windows
            .get(&window_id)
            .is_some_and(|window| window.salon_id == salon_id && window.staff_id == staff_id);
        if !owned {
            return Err(AvailabilityError::NotFound);
        }
        windows.remove(&window_id);

        info!("Window {} deleted", window_id);
        Ok(())
    }
}
