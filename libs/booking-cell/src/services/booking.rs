use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use availability_cell::{AvailabilityStore, BookingLedger, SlotResolver};

use crate::error::BookingError;
use crate::models::{Booking, BookingFilter, BookingProposal, BookingStatus, ValidatedBooking};
use crate::services::lifecycle::BookingLifecycleService;
use crate::services::store::BookingStore;
use crate::services::validator::{check_notes, BookingValidator};

pub struct BookingService {
    store: Arc<dyn BookingStore>,
    validator: BookingValidator,
    lifecycle_service: BookingLifecycleService,
}

impl BookingService {
    /// The booking store also serves as the ledger the validator checks
    /// overlaps against.
    pub fn new<S>(windows: Arc<dyn AvailabilityStore>, store: Arc<S>) -> Self
    where
        S: BookingStore + 'static,
    {
        let ledger: Arc<dyn BookingLedger> = store.clone();
        let validator = BookingValidator::new(SlotResolver::new(windows, ledger));

        Self {
            store,
            validator,
            lifecycle_service: BookingLifecycleService::new(),
        }
    }

    /// Dry run of `create_booking`.
    pub async fn validate_booking(
        &self,
        proposal: &BookingProposal,
    ) -> Result<ValidatedBooking, BookingError> {
        self.validator.validate(proposal, None, Utc::now()).await
    }

    pub async fn create_booking(&self, proposal: BookingProposal) -> Result<Booking, BookingError> {
        debug!("Creating booking for client {} with staff {}", proposal.client_id, proposal.staff_id);

        let validated = self.validator.validate(&proposal, None, Utc::now()).await?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            salon_id: validated.salon_id,
            client_id: validated.client_id,
            service_id: validated.service_id,
            staff_id: validated.staff_id,
            start_time: validated.start_time,
            end_time: validated.end_time,
            status: BookingStatus::Pending,
            notes: validated.notes,
            created_at: now,
            updated_at: now,
        };

        let booking = self.store.insert_booking(booking).await?;
        info!("Booking {} created for staff {}", booking.id, booking.staff_id);
        Ok(booking)
    }

    pub async fn get_booking(&self, salon_id: Uuid, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.store.get_booking(salon_id, booking_id).await
    }

    pub async fn list_bookings(
        &self,
        salon_id: Uuid,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, BookingError> {
        self.store.list_bookings(salon_id, filter).await
    }

    /// Moves a booking to `new_start`, keeping its duration.
    pub async fn reschedule_booking(
        &self,
        salon_id: Uuid,
        booking_id: Uuid,
        new_start: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let current = self.store.get_booking(salon_id, booking_id).await?;
        self.lifecycle_service.ensure_modifiable(current.status)?;

        let proposal = BookingProposal {
            salon_id,
            staff_id: current.staff_id,
            client_id: current.client_id,
            service_id: current.service_id,
            start_time: new_start,
            duration_minutes: current.duration().num_minutes(),
            notes: current.notes.clone(),
        };
        let validated = self
            .validator
            .validate(&proposal, Some(booking_id), Utc::now())
            .await?;

        let rescheduled = Booking {
            start_time: validated.start_time,
            end_time: validated.end_time,
            updated_at: Utc::now(),
            ..current
        };

        let booking = self.store.update_booking(rescheduled).await?;
        info!("Booking {} rescheduled to {}", booking.id, booking.start_time);
        Ok(booking)
    }

    pub async fn update_status(
        &self,
        salon_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let current = self.store.get_booking(salon_id, booking_id).await?;
        self.lifecycle_service.validate_status_transition(current.status, status)?;

        let booking = self
            .store
            .update_booking(Booking { status, updated_at: Utc::now(), ..current })
            .await?;

        info!("Booking {} is now {}", booking.id, booking.status);
        Ok(booking)
    }

    /// Cancels a booking. `notes` replaces the stored notes only when given.
    pub async fn cancel_booking(
        &self,
        salon_id: Uuid,
        booking_id: Uuid,
        notes: Option<String>,
    ) -> Result<Booking, BookingError> {
        if let Some(notes) = &notes {
            check_notes(notes)?;
        }

        let current = self.store.get_booking(salon_id, booking_id).await?;
        self.lifecycle_service.ensure_modifiable(current.status)?;
        self.lifecycle_service
            .validate_status_transition(current.status, BookingStatus::Cancelled)?;

        let notes = notes.or_else(|| current.notes.clone());
        let booking = self
            .store
            .update_booking(Booking {
                status: BookingStatus::Cancelled,
                notes,
                updated_at: Utc::now(),
                ..current
            })
            .await?;

        info!("Booking {} cancelled", booking.id);
        Ok(booking)
    }
}
