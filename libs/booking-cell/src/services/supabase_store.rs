use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::{AvailabilityError, BookedInterval, BookingLedger, TimeRange};
use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, SupabaseError};

use crate::error::BookingError;
use crate::models::{Booking, BookingFilter};
use crate::services::store::BookingStore;

const TABLE: &str = "/rest/v1/bookings";

/// Bookings persisted in the `bookings` PostgREST table. The table is expected
/// to carry an exclusion constraint over `(staff_id, tstzrange(start_time,
/// end_time))` for non-cancelled rows; its 409 surfaces as `Conflict`.
pub struct SupabaseBookingStore {
    supabase: Arc<SupabaseClient>,
}

#[derive(Debug, Deserialize)]
struct IntervalRow {
    id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

fn encode_time(time: DateTime<Utc>) -> String {
    urlencoding::encode(&time.to_rfc3339()).into_owned()
}

fn map_write_error(err: anyhow::Error) -> BookingError {
    match err.downcast_ref::<SupabaseError>() {
        Some(SupabaseError::Conflict(body)) => {
            warn!("Booking write rejected by constraint: {}", body);
            BookingError::Conflict { booking_id: None }
        }
        _ => BookingError::storage(err),
    }
}

impl SupabaseBookingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<Booking>, BookingError> {
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None, None)
            .await
            .map_err(BookingError::storage)?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Booking>, _>>()
            .map_err(|e| BookingError::Storage(format!("Failed to parse booking: {}", e)))
    }

    async fn write(&self, method: Method, path: &str, body: Value) -> Result<Booking, BookingError> {
        let rows: Vec<Booking> = self
            .supabase
            .request_with_headers(
                method,
                path,
                None,
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(map_write_error)?;

        rows.into_iter().next().ok_or(BookingError::NotFound)
    }
}

#[async_trait]
impl BookingLedger for SupabaseBookingStore {
    async fn active_bookings(
        &self,
        staff_id: Uuid,
        range: TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let mut path = format!(
            "{}?select=id,start_time,end_time&staff_id=eq.{}&status=neq.CANCELLED&start_time=lt.{}&end_time=gt.{}&order=start_time.asc",
            TABLE,
            staff_id,
            encode_time(range.end),
            encode_time(range.start)
        );
        if let Some(excluded) = exclude {
            path.push_str(&format!("&id=neq.{}", excluded));
        }

        debug!("Fetching active bookings for staff {}", staff_id);
        let rows: Vec<IntervalRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(AvailabilityError::storage)?;

        Ok(rows
            .into_iter()
            .map(|row| BookedInterval { booking_id: row.id, start: row.start_time, end: row.end_time })
            .collect())
    }
}

#[async_trait]
impl BookingStore for SupabaseBookingStore {
    async fn get_booking(&self, salon_id: Uuid, booking_id: Uuid) -> Result<Booking, BookingError> {
        let path = format!("{}?salon_id=eq.{}&id=eq.{}", TABLE, salon_id, booking_id);
        self.fetch(&path)
            .await?
            .into_iter()
            .next()
            .ok_or(BookingError::NotFound)
    }

    async fn list_bookings(
        &self,
        salon_id: Uuid,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, BookingError> {
        let mut query_parts = vec![format!("salon_id=eq.{}", salon_id)];

        if let Some(staff_id) = filter.staff_id {
            query_parts.push(format!("staff_id=eq.{}", staff_id));
        }
        if let Some(service_id) = filter.service_id {
            query_parts.push(format!("service_id=eq.{}", service_id));
        }
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status.as_str()));
        }
        if let Some(from) = filter.from {
            query_parts.push(format!("start_time=gte.{}", encode_time(from)));
        }
        if let Some(to) = filter.to {
            query_parts.push(format!("start_time=lt.{}", encode_time(to)));
        }
        query_parts.push("order=start_time.asc".to_string());

        let path = format!("{}?{}", TABLE, query_parts.join("&"));
        self.fetch(&path).await
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, BookingError> {
        let body = serde_json::to_value(&booking).map_err(BookingError::storage)?;
        let stored = self.write(Method::POST, TABLE, body).await?;

        info!("Booking {} stored for staff {}", stored.id, stored.staff_id);
        Ok(stored)
    }

    async fn update_booking(&self, booking: Booking) -> Result<Booking, BookingError> {
        let path = format!("{}?salon_id=eq.{}&id=eq.{}", TABLE, booking.salon_id, booking.id);
        let body = json!({
            "start_time": booking.start_time,
            "end_time": booking.end_time,
            "status": booking.status,
            "notes": booking.notes,
            "updated_at": booking.updated_at
        });

        let stored = self.write(Method::PATCH, &path, body).await?;
        info!("Booking {} updated", stored.id);
        Ok(stored)
    }
}
