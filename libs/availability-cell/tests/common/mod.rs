#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use availability_cell::{
    AvailabilityError, BookedInterval, BookingLedger, CreateWindowRequest, TimeRange, WindowKind,
};

/// 2030-06-03 is a Monday (day_of_week 1).
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 3).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    date.and_time(time(hour, minute)).and_utc()
}

pub fn range(date: NaiveDate, from: (u32, u32), to: (u32, u32)) -> TimeRange {
    TimeRange { start: at(date, from.0, from.1), end: at(date, to.0, to.1) }
}

pub fn window(day_of_week: i32, from: (u32, u32), to: (u32, u32), kind: WindowKind) -> CreateWindowRequest {
    CreateWindowRequest {
        day_of_week,
        start_time: time(from.0, from.1),
        end_time: time(to.0, to.1),
        kind,
        specific_date: None,
    }
}

pub fn availability(day_of_week: i32, from: (u32, u32), to: (u32, u32)) -> CreateWindowRequest {
    window(day_of_week, from, to, WindowKind::Availability)
}

pub fn time_off(day_of_week: i32, from: (u32, u32), to: (u32, u32)) -> CreateWindowRequest {
    window(day_of_week, from, to, WindowKind::TimeOff)
}

/// Ledger over a fixed list of (staff, interval) pairs.
#[derive(Default)]
pub struct StaticLedger {
    bookings: Mutex<Vec<(Uuid, BookedInterval)>>,
}

impl StaticLedger {
    pub async fn book(&self, staff_id: Uuid, range: TimeRange) -> Uuid {
        let booking_id = Uuid::new_v4();
        self.bookings.lock().await.push((
            staff_id,
            BookedInterval { booking_id, start: range.start, end: range.end },
        ));
        booking_id
    }
}

#[async_trait]
impl BookingLedger for StaticLedger {
    async fn active_bookings(
        &self,
        staff_id: Uuid,
        range: TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .iter()
            .filter(|(staff, booked)| {
                *staff == staff_id
                    && Some(booked.booking_id) != exclude
                    && booked.range().overlaps(&range)
            })
            .map(|(_, booked)| booked.clone())
            .collect())
    }
}
