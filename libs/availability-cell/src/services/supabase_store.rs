use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::AvailabilityError;
use crate::models::{
    AvailabilityWindow, CreateWindowRequest, DayOfWeek, UpdateWindowRequest,
};
use crate::services::store::{validate_window, AvailabilityStore};

const TABLE: &str = "/rest/v1/staff_availabilities";

/// Windows persisted in the `staff_availabilities` PostgREST table.
///
/// Overlap validation happens client-side before each write, so two racing
/// writers can both pass it; an exclusion constraint on the table is expected
/// to catch that case.
pub struct SupabaseAvailabilityStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAvailabilityStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None, None)
            .await
            .map_err(AvailabilityError::storage)?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilityWindow>, _>>()
            .map_err(|e| AvailabilityError::Storage(format!("Failed to parse availability: {}", e)))
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        self.supabase
            .request_with_headers(
                method,
                path,
                None,
                body,
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(AvailabilityError::storage)
    }
}

fn scoped(salon_id: Uuid, staff_id: Uuid) -> String {
    format!("{}?salon_id=eq.{}&staff_id=eq.{}", TABLE, salon_id, staff_id)
}

fn format_time(time: chrono::NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

#[async_trait]
impl AvailabilityStore for SupabaseAvailabilityStore {
    async fn windows_for_staff(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        debug!("Fetching availability for staff {} in salon {}", staff_id, salon_id);
        let path = format!("{}&order=day_of_week.asc,start_time.asc", scoped(salon_id, staff_id));
        self.fetch(&path).await
    }

    async fn windows_for_day(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        let path = format!(
            "{}&day_of_week=eq.{}&or=(specific_date.is.null,specific_date.eq.{})&order=start_time.asc",
            scoped(salon_id, staff_id),
            DayOfWeek::of(date),
            date
        );
        let windows = self.fetch(&path).await?;
        Ok(windows.into_iter().filter(|window| window.applies_on(date)).collect())
    }

    async fn get_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        let path = format!("{}&id=eq.{}", scoped(salon_id, staff_id), window_id);
        self.fetch(&path)
            .await?
            .into_iter()
            .next()
            .ok_or(AvailabilityError::NotFound)
    }

    async fn create_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        request: CreateWindowRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        let existing = self.windows_for_staff(salon_id, staff_id).await?;
        let day_of_week = validate_window(&request, &existing, None)?;

        let now = Utc::now().to_rfc3339();
        let body = json!({
            "id": Uuid::new_v4(),
            "salon_id": salon_id,
            "staff_id": staff_id,
            "day_of_week": i32::from(day_of_week),
            "start_time": format_time(request.start_time),
            "end_time": format_time(request.end_time),
            "kind": request.kind,
            "specific_date": request.specific_date,
            "created_at": now,
            "updated_at": now
        });

        let window = self
            .write(Method::POST, TABLE, Some(body))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AvailabilityError::Storage("Failed to create availability".to_string()))?;

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
        let existing = self.windows_for_staff(salon_id, staff_id).await?;
        let current = existing
            .iter()
            .find(|window| window.id == window_id)
            .ok_or(AvailabilityError::NotFound)?;

        let candidate = request.apply_to(current);
        validate_window(&candidate, &existing, Some(window_id))?;

        let body = json!({
            "start_time": format_time(candidate.start_time),
            "end_time": format_time(candidate.end_time),
            "kind": candidate.kind,
            "updated_at": Utc::now().to_rfc3339()
        });
        let path = format!("{}&id=eq.{}", scoped(salon_id, staff_id), window_id);

        let window = self
            .write(Method::PATCH, &path, Some(body))
            .await?
            .into_iter()
            .next()
            .ok_or(AvailabilityError::NotFound)?;

        info!("Window {} updated", window_id);
        Ok(window)
    }

    async fn delete_window(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        window_id: Uuid,
    ) -> Result<(), AvailabilityError> {
        let path = format!("{}&id=eq.{}", scoped(salon_id, staff_id), window_id);
        let deleted = self.write(Method::DELETE, &path, None).await?;

        if deleted.is_empty() {
            return Err(AvailabilityError::NotFound);
        }

        info!("Window {} deleted", window_id);
        Ok(())
    }
}
