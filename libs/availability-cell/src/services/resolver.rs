use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::error::AvailabilityError;
use crate::models::{bookable_duration, BookableSlots, BookedInterval, TimeRange, WindowKind};
use crate::services::intervals::{at_least, candidate_starts, merge, subtract};
use crate::services::ledger::BookingLedger;
use crate::services::store::AvailabilityStore;

/// Everything that shapes one staff member's bookable time on one date.
#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    /// Merged AVAILABILITY windows.
    pub availability: Vec<TimeRange>,
    /// Merged TIME_OFF windows.
    pub time_off: Vec<TimeRange>,
    pub booked: Vec<BookedInterval>,
}

impl DaySchedule {
    pub fn free_intervals(&self) -> Vec<TimeRange> {
        let booked: Vec<TimeRange> = self.booked.iter().map(BookedInterval::range).collect();
        let open = subtract(&self.availability, &self.time_off);
        subtract(&open, &booked)
    }
}

#[derive(Clone)]
pub struct SlotResolver {
    windows: Arc<dyn AvailabilityStore>,
    ledger: Arc<dyn BookingLedger>,
}

impl SlotResolver {
    pub fn new(windows: Arc<dyn AvailabilityStore>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { windows, ledger }
    }

    pub async fn day_schedule(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
        exclude_booking: Option<Uuid>,
    ) -> Result<DaySchedule, AvailabilityError> {
        let windows = self.windows.windows_for_day(salon_id, staff_id, date).await?;

        let (availability, time_off): (Vec<_>, Vec<_>) = windows
            .iter()
            .partition(|window| window.kind == WindowKind::Availability);

        let availability = merge(availability.iter().map(|w| w.range_on(date)).collect());
        let time_off = merge(time_off.iter().map(|w| w.range_on(date)).collect());

        let booked = if availability.is_empty() {
            Vec::new()
        } else {
            self.ledger
                .active_bookings(staff_id, TimeRange::day(date), exclude_booking)
                .await?
        };

        debug!(
            "Schedule for staff {} on {}: {} availability, {} time off, {} booked",
            staff_id,
            date,
            availability.len(),
            time_off.len(),
            booked.len()
        );

        Ok(DaySchedule { availability, time_off, booked })
    }

    /// Free intervals on `date` that can hold `duration`, sorted and disjoint.
    pub async fn resolve(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
        duration: Duration,
    ) -> Result<Vec<TimeRange>, AvailabilityError> {
        if duration <= Duration::zero() || bookable_duration(duration.num_minutes()).is_none() {
            return Err(AvailabilityError::InvalidDuration(duration.num_minutes()));
        }

        let schedule = self.day_schedule(salon_id, staff_id, date, None).await?;
        Ok(at_least(schedule.free_intervals(), duration))
    }

    pub async fn bookable_slots(
        &self,
        salon_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
        duration_minutes: i64,
        granularity_minutes: i64,
    ) -> Result<BookableSlots, AvailabilityError> {
        let duration = bookable_duration(duration_minutes)
            .ok_or(AvailabilityError::InvalidDuration(duration_minutes))?;
        let granularity = Duration::try_minutes(granularity_minutes).unwrap_or(duration);

        let intervals = self.resolve(salon_id, staff_id, date, duration).await?;
        let slots = candidate_starts(&intervals, duration, granularity);

        Ok(BookableSlots {
            salon_id,
            staff_id,
            date,
            duration_minutes,
            intervals,
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateWindowRequest;
    use crate::services::ledger::MockBookingLedger;
    use crate::services::store::InMemoryAvailabilityStore;
    use chrono::NaiveTime;
    use mockall::predicate::{always, eq};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn skips_ledger_when_no_availability() {
        let mut ledger = MockBookingLedger::new();
        ledger.expect_active_bookings().never();

        let resolver = SlotResolver::new(Arc::new(InMemoryAvailabilityStore::new()), Arc::new(ledger));
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();

        let slots = resolver
            .resolve(Uuid::new_v4(), Uuid::new_v4(), date, Duration::minutes(30))
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn forwards_excluded_booking_to_ledger() {
        let salon_id = Uuid::new_v4();
        let staff_id = Uuid::new_v4();
        let moving = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();

        let store = InMemoryAvailabilityStore::new();
        store
            .create_window(salon_id, staff_id, CreateWindowRequest {
                day_of_week: 1,
                start_time: time(9, 0),
                end_time: time(12, 0),
                kind: WindowKind::Availability,
                specific_date: None,
            })
            .await
            .unwrap();

        let mut ledger = MockBookingLedger::new();
        ledger
            .expect_active_bookings()
            .with(eq(staff_id), always(), eq(Some(moving)))
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let resolver = SlotResolver::new(Arc::new(store), Arc::new(ledger));
        let schedule = resolver
            .day_schedule(salon_id, staff_id, date, Some(moving))
            .await
            .unwrap();

        assert_eq!(schedule.free_intervals().len(), 1);
    }

    #[tokio::test]
    async fn rejects_non_positive_duration() {
        let resolver = SlotResolver::new(
            Arc::new(InMemoryAvailabilityStore::new()),
            Arc::new(MockBookingLedger::new()),
        );
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();

        let err = resolver
            .bookable_slots(Uuid::new_v4(), Uuid::new_v4(), date, 0, 15)
            .await
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::InvalidDuration(0)));
    }

    #[tokio::test]
    async fn rejects_duration_longer_than_a_day() {
        let mut ledger = MockBookingLedger::new();
        ledger.expect_active_bookings().never();
        let resolver = SlotResolver::new(Arc::new(InMemoryAvailabilityStore::new()), Arc::new(ledger));
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();

        for minutes in [24 * 60 + 1, 1_000_000_000_000, i64::MAX] {
            let err = resolver
                .bookable_slots(Uuid::new_v4(), Uuid::new_v4(), date, minutes, 15)
                .await
                .unwrap_err();
            assert!(matches!(err, AvailabilityError::InvalidDuration(m) if m == minutes));
        }
    }
}
