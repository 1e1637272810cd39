use thiserror::Error;
use uuid::Uuid;

use availability_cell::AvailabilityError;
use shared_models::error::AppError;

use crate::models::BookingStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Duration must be between 1 and 1440 minutes, got {0}")]
    InvalidDuration(i64),

    #[error("Notes must be at most 500 characters, got {0}")]
    NotesTooLong(usize),

    #[error("Appointment time must be in the future")]
    StartInPast,

    #[error("Requested time is outside the staff member's availability")]
    OutsideAvailability,

    #[error("Staff member is on time off at the requested time")]
    StaffOnTimeOff,

    #[error("Staff member is already booked at the requested time")]
    Conflict { booking_id: Option<Uuid> },

    #[error("Booking not found")]
    NotFound,

    #[error("Booking cannot be modified in status {0}")]
    NotModifiable(BookingStatus),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: BookingStatus, to: BookingStatus },

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BookingError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        BookingError::Storage(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidDuration(_)
            | BookingError::NotesTooLong(_)
            | BookingError::StartInPast
            | BookingError::InvalidStatusTransition { .. } => AppError::ValidationError(err.to_string()),
            BookingError::OutsideAvailability
            | BookingError::StaffOnTimeOff
            | BookingError::Conflict { .. }
            | BookingError::NotModifiable(_) => AppError::Conflict(err.to_string()),
            BookingError::NotFound => AppError::NotFound(err.to_string()),
            BookingError::Availability(inner) => inner.into(),
            BookingError::Storage(msg) => AppError::Database(msg),
        }
    }
}
