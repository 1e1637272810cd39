#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use availability_cell::{
    AvailabilityStore, CreateWindowRequest, InMemoryAvailabilityStore, SlotResolver, WindowKind,
};
use booking_cell::{BookingProposal, BookingService, BookingValidator, InMemoryBookingStore};

/// 2030-06-03 is a Monday (day_of_week 1).
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 3).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap()).and_utc()
}

/// A fixed "now" well before every fixture date.
pub fn long_before() -> DateTime<Utc> {
    at(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), 0, 0)
}

pub fn window(day_of_week: i32, from: (u32, u32), to: (u32, u32), kind: WindowKind) -> CreateWindowRequest {
    CreateWindowRequest {
        day_of_week,
        start_time: NaiveTime::from_hms_opt(from.0, from.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(to.0, to.1, 0).unwrap(),
        kind,
        specific_date: None,
    }
}

/// One salon with one staff member, backed by in-memory stores.
pub struct Salon {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub windows: Arc<InMemoryAvailabilityStore>,
    pub bookings: Arc<InMemoryBookingStore>,
    pub service: Arc<BookingService>,
}

impl Salon {
    pub fn new() -> Self {
        let windows = Arc::new(InMemoryAvailabilityStore::new());
        let bookings = Arc::new(InMemoryBookingStore::new());
        let service = Arc::new(BookingService::new(windows.clone(), bookings.clone()));

        Self {
            salon_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            windows,
            bookings,
            service,
        }
    }

    /// Staff works Mondays 09:00-17:00 with a 12:00-13:00 lunch break.
    pub async fn standard_week() -> Self {
        let salon = Self::new();
        salon.add_window(window(1, (9, 0), (17, 0), WindowKind::Availability)).await;
        salon.add_window(window(1, (12, 0), (13, 0), WindowKind::TimeOff)).await;
        salon
    }

    pub async fn add_window(&self, request: CreateWindowRequest) {
        self.windows
            .create_window(self.salon_id, self.staff_id, request)
            .await
            .unwrap();
    }

    pub fn proposal(&self, start: DateTime<Utc>, duration_minutes: i64) -> BookingProposal {
        BookingProposal {
            salon_id: self.salon_id,
            staff_id: self.staff_id,
            client_id: self.client_id,
            service_id: self.service_id,
            start_time: start,
            duration_minutes,
            notes: None,
        }
    }

    pub fn validator(&self) -> BookingValidator {
        BookingValidator::new(SlotResolver::new(self.windows.clone(), self.bookings.clone()))
    }
}
