use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Start time must be before end time")]
    InvalidTimeRange,

    #[error("Day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(i32),

    #[error("Specific date {date} does not fall on day of week {day_of_week}")]
    SpecificDateMismatch { date: NaiveDate, day_of_week: u8 },

    #[error("Overlapping availability exists ({existing_id})")]
    OverlappingWindow { existing_id: Uuid },

    #[error("Duration must be between 1 and 1440 minutes, got {0}")]
    InvalidDuration(i64),

    #[error("Availability not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AvailabilityError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        AvailabilityError::Storage(err.to_string())
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::NotFound => AppError::NotFound(err.to_string()),
            AvailabilityError::OverlappingWindow { .. } => AppError::Conflict(err.to_string()),
            AvailabilityError::Storage(msg) => AppError::Database(msg),
            AvailabilityError::InvalidTimeRange
            | AvailabilityError::InvalidDayOfWeek(_)
            | AvailabilityError::SpecificDateMismatch { .. }
            | AvailabilityError::InvalidDuration(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
