use tracing::{debug, warn};

use crate::error::BookingError;
use crate::models::BookingStatus;

#[derive(Debug, Clone, Copy, Default)]
pub struct BookingLifecycleService;

impl BookingLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<(), BookingError> {
        debug!("Validating status transition from {:?} to {:?}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {:?} -> {:?}", current_status, new_status);
            return Err(BookingError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: BookingStatus) -> Vec<BookingStatus> {
        match current_status {
            BookingStatus::Pending => vec![
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
                BookingStatus::Completed,
            ],
            BookingStatus::Confirmed => vec![BookingStatus::Completed, BookingStatus::Cancelled],
            // Terminal
            BookingStatus::Cancelled | BookingStatus::Completed => vec![],
        }
    }

    /// Rejects edits (reschedule, cancel) of bookings in a terminal status.
    pub fn ensure_modifiable(&self, status: BookingStatus) -> Result<(), BookingError> {
        match status {
            BookingStatus::Cancelled | BookingStatus::Completed => {
                warn!("Booking in status {:?} cannot be modified", status);
                Err(BookingError::NotModifiable(status))
            }
            BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
        }
    }
}
