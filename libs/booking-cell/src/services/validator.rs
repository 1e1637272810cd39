use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use availability_cell::{bookable_duration, SlotResolver, TimeRange};

use crate::error::BookingError;
use crate::models::{BookingProposal, ValidatedBooking};

pub const MAX_NOTES_CHARS: usize = 500;

pub fn check_notes(notes: &str) -> Result<(), BookingError> {
    let length = notes.chars().count();
    if length > MAX_NOTES_CHARS {
        return Err(BookingError::NotesTooLong(length));
    }
    Ok(())
}

/// Checks a proposed booking against the staff member's schedule for the day
/// it starts on.
#[derive(Clone)]
pub struct BookingValidator {
    resolver: SlotResolver,
}

impl BookingValidator {
    pub fn new(resolver: SlotResolver) -> Self {
        Self { resolver }
    }

    /// Checks, in order: duration of at most one day, notes length, start in
    /// the future, containment in one availability interval, no time off, no
    /// overlapping booking.
    /// `exclude_booking` is ignored when looking for overlaps.
    pub async fn validate(
        &self,
        proposal: &BookingProposal,
        exclude_booking: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<ValidatedBooking, BookingError> {
        let invalid_duration = || BookingError::InvalidDuration(proposal.duration_minutes);
        let duration = bookable_duration(proposal.duration_minutes).ok_or_else(invalid_duration)?;

        if let Some(notes) = &proposal.notes {
            check_notes(notes)?;
        }

        if proposal.start_time <= now {
            return Err(BookingError::StartInPast);
        }

        let requested = TimeRange {
            start: proposal.start_time,
            end: proposal
                .start_time
                .checked_add_signed(duration)
                .ok_or_else(invalid_duration)?,
        };
        let date = requested.start.date_naive();

        debug!(
            "Validating booking for staff {} from {} to {}",
            proposal.staff_id, requested.start, requested.end
        );

        let schedule = self
            .resolver
            .day_schedule(proposal.salon_id, proposal.staff_id, date, exclude_booking)
            .await?;

        // A booking running past midnight can never be contained here.
        if !schedule.availability.iter().any(|range| range.contains(&requested)) {
            warn!("Booking for staff {} falls outside availability", proposal.staff_id);
            return Err(BookingError::OutsideAvailability);
        }

        if schedule.time_off.iter().any(|range| range.overlaps(&requested)) {
            warn!("Booking for staff {} overlaps time off", proposal.staff_id);
            return Err(BookingError::StaffOnTimeOff);
        }

        if let Some(existing) = schedule
            .booked
            .iter()
            .find(|booked| booked.range().overlaps(&requested))
        {
            warn!(
                "Booking for staff {} conflicts with booking {}",
                proposal.staff_id, existing.booking_id
            );
            return Err(BookingError::Conflict { booking_id: Some(existing.booking_id) });
        }

        Ok(ValidatedBooking {
            salon_id: proposal.salon_id,
            staff_id: proposal.staff_id,
            client_id: proposal.client_id,
            service_id: proposal.service_id,
            start_time: requested.start,
            end_time: requested.end,
            notes: proposal.notes.clone(),
        })
    }
}
