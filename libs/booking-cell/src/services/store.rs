use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use availability_cell::{AvailabilityError, BookedInterval, BookingLedger, TimeRange};

use crate::error::BookingError;
use crate::models::{Booking, BookingFilter};

/// Persistent bookings. Implementations must keep active bookings of one
/// staff member disjoint: `insert_booking` and `update_booking` fail with
/// `Conflict` rather than write an overlapping active booking.
#[async_trait]
pub trait BookingStore: BookingLedger {
    async fn get_booking(&self, salon_id: Uuid, booking_id: Uuid) -> Result<Booking, BookingError>;

    /// Bookings of the salon matching `filter`, ordered by start time.
    async fn list_bookings(
        &self,
        salon_id: Uuid,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, BookingError>;

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, BookingError>;

    async fn update_booking(&self, booking: Booking) -> Result<Booking, BookingError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_overlap(bookings: &HashMap<Uuid, Booking>, candidate: &Booking) -> Option<Uuid> {
    if !candidate.status.is_active() {
        return None;
    }
    let range = candidate.range();
    bookings
        .values()
        .find(|existing| {
            existing.id != candidate.id
                && existing.staff_id == candidate.staff_id
                && existing.status.is_active()
                && existing.range().overlaps(&range)
        })
        .map(|existing| existing.id)
}

#[async_trait]
impl BookingLedger for InMemoryBookingStore {
    async fn active_bookings(
        &self,
        staff_id: Uuid,
        range: TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let bookings = self.bookings.read().await;
        let mut booked: Vec<BookedInterval> = bookings
            .values()
            .filter(|booking| {
                booking.staff_id == staff_id
                    && booking.status.is_active()
                    && Some(booking.id) != exclude
                    && booking.range().overlaps(&range)
            })
            .map(|booking| BookedInterval {
                booking_id: booking.id,
                start: booking.start_time,
                end: booking.end_time,
            })
            .collect();
        booked.sort_by_key(|interval| interval.start);
        Ok(booked)
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn get_booking(&self, salon_id: Uuid, booking_id: Uuid) -> Result<Booking, BookingError> {
        let bookings = self.bookings.read().await;
        bookings
            .get(&booking_id)
            .filter(|booking| booking.salon_id == salon_id)
            .cloned()
            .ok_or(BookingError::NotFound)
    }

    async fn list_bookings(
        &self,
        salon_id: Uuid,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, BookingError> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|booking| booking.salon_id == salon_id && filter.matches(booking))
            .cloned()
            .collect();
        result.sort_by_key(|booking| booking.start_time);
        Ok(result)
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, BookingError> {
        let mut bookings = self.bookings.write().await;

        if let Some(existing) = find_overlap(&bookings, &booking) {
            warn!("Insert of booking {} lost race against booking {}", booking.id, existing);
            return Err(BookingError::Conflict { booking_id: Some(existing) });
        }

        bookings.insert(booking.id, booking.clone());
        info!("Booking {} stored for staff {}", booking.id, booking.staff_id);
        Ok(booking)
    }

    async fn update_booking(&self, booking: Booking) -> Result<Booking, BookingError> {
        let mut bookings = self.bookings.write().await;

        let owned = bookings
            .get(&booking.id)
            .is_some_and(|current| current.salon_id == booking.salon_id);
        if !owned {
            return Err(BookingError::NotFound);
        }

        if let Some(existing) = find_overlap(&bookings, &booking) {
            warn!("Update of booking {} overlaps booking {}", booking.id, existing);
            return Err(BookingError::Conflict { booking_id: Some(existing) });
        }

        bookings.insert(booking.id, booking.clone());
        info!("Booking {} updated", booking.id);
        Ok(booking)
    }
}
