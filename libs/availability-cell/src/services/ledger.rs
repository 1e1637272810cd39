use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AvailabilityError;
use crate::models::{BookedInterval, TimeRange};

/// Read-only view of existing bookings, implemented by the booking stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Non-cancelled bookings of `staff_id` overlapping `range`, ordered by start.
    /// `exclude` drops one booking, used when a booking is being moved.
    async fn active_bookings(
        &self,
        staff_id: Uuid,
        range: TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<BookedInterval>, AvailabilityError>;
}
