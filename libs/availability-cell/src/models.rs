use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AvailabilityError;

/// 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(value: i32) -> Result<Self, AvailabilityError> {
        match value {
            0..=6 => Ok(Self(value as u8)),
            _ => Err(AvailabilityError::InvalidDayOfWeek(value)),
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<i32> for DayOfWeek {
    type Error = AvailabilityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayOfWeek> for i32 {
    fn from(day: DayOfWeek) -> Self {
        day.0 as i32
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowKind {
    Availability,
    TimeOff,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Availability => "AVAILABILITY",
            WindowKind::TimeOff => "TIME_OFF",
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AvailabilityError> {
        if start >= end {
            return Err(AvailabilityError::InvalidTimeRange);
        }
        Ok(Self { start, end })
    }

    /// The whole calendar day `[date 00:00, date+1 00:00)`.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self { start, end: start + Duration::days(1) }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Longest bookable duration. Anything longer cannot fit inside one day.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// `minutes` as a `Duration`, or `None` when it is not in
/// `1..=MAX_DURATION_MINUTES`.
pub fn bookable_duration(minutes: i64) -> Option<Duration> {
    if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
        return None;
    }
    Duration::try_minutes(minutes)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: WindowKind,
    /// Set for one-off windows; `None` means the window recurs weekly.
    #[serde(default)]
    pub specific_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.day_of_week == DayOfWeek::of(date)
            && self.specific_date.map_or(true, |specific| specific == date)
    }

    pub fn range_on(&self, date: NaiveDate) -> TimeRange {
        TimeRange {
            start: date.and_time(self.start_time).and_utc(),
            end: date.and_time(self.end_time).and_utc(),
        }
    }

    /// Whether both windows can ever apply on the same calendar date.
    pub fn shares_dates_with(&self, day_of_week: DayOfWeek, specific_date: Option<NaiveDate>) -> bool {
        if self.day_of_week != day_of_week {
            return false;
        }
        match (self.specific_date, specific_date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// An existing, non-cancelled booking as seen by the slot resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub booking_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookedInterval {
    pub fn range(&self) -> TimeRange {
        TimeRange { start: self.start, end: self.end }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: WindowKind,
    #[serde(default)]
    pub specific_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWindowRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub kind: Option<WindowKind>,
}

impl UpdateWindowRequest {
    /// The window as it would look after the update.
    pub fn apply_to(&self, current: &AvailabilityWindow) -> CreateWindowRequest {
        CreateWindowRequest {
            day_of_week: current.day_of_week.into(),
            start_time: self.start_time.unwrap_or(current.start_time),
            end_time: self.end_time.unwrap_or(current.end_time),
            kind: self.kind.unwrap_or(current.kind),
            specific_date: current.specific_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlots {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    /// Free intervals long enough for the requested duration.
    pub intervals: Vec<TimeRange>,
    /// Candidate appointments aligned to the configured granularity.
    pub slots: Vec<TimeRange>,
}
