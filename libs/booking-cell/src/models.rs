use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use availability_cell::TimeRange;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Every status except CANCELLED holds its slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn range(&self) -> TimeRange {
        TimeRange { start: self.start_time, end: self.end_time }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// A booking as requested, before it has been checked against the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingProposal {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A proposal that passed validation, with its end time resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedBooking {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    pub fn into_proposal(self, salon_id: Uuid) -> BookingProposal {
        BookingProposal {
            salon_id,
            staff_id: self.staff_id,
            client_id: self.client_id,
            service_id: self.service_id,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub notes: Option<String>,
}

/// Listing filter. `from`/`to` bound the booking start, `to` exclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub staff_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.staff_id.map_or(true, |staff_id| booking.staff_id == staff_id)
            && self.service_id.map_or(true, |service_id| booking.service_id == service_id)
            && self.status.map_or(true, |status| booking.status == status)
            && self.from.map_or(true, |from| booking.start_time >= from)
            && self.to.map_or(true, |to| booking.start_time < to)
    }
}
