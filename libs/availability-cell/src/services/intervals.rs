//! Interval arithmetic over half-open [`TimeRange`]s.

use chrono::{Duration, NaiveTime};

use crate::models::TimeRange;

/// Sorts and coalesces ranges. Touching ranges (`a.end == b.start`) merge.
pub fn merge(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by_key(|range| range.start);

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Removes every `busy` range from `free`. `free` must already be merged.
pub fn subtract(free: &[TimeRange], busy: &[TimeRange]) -> Vec<TimeRange> {
    let busy = merge(busy.to_vec());
    let mut result = Vec::new();

    for range in free {
        let mut cursor = range.start;
        for blocked in &busy {
            if blocked.end <= cursor {
                continue;
            }
            if blocked.start >= range.end {
                break;
            }
            if blocked.start > cursor {
                result.push(TimeRange { start: cursor, end: blocked.start });
            }
            cursor = cursor.max(blocked.end);
            if cursor >= range.end {
                break;
            }
        }
        if cursor < range.end {
            result.push(TimeRange { start: cursor, end: range.end });
        }
    }

    result
}

/// Keeps only intervals that can hold `duration`.
pub fn at_least(ranges: Vec<TimeRange>, duration: Duration) -> Vec<TimeRange> {
    ranges.into_iter().filter(|range| range.duration() >= duration).collect()
}

/// Enumerates `[start, start + duration)` candidates inside each interval, with
/// starts aligned to `granularity` counted from midnight of the interval's day.
pub fn candidate_starts(
    intervals: &[TimeRange],
    duration: Duration,
    granularity: Duration,
) -> Vec<TimeRange> {
    let step = granularity.num_seconds().max(60);
    let mut slots = Vec::new();

    for interval in intervals {
        let midnight = interval.start.date_naive().and_time(NaiveTime::MIN).and_utc();
        let offset = (interval.start - midnight).num_seconds() % step;
        let mut start = if offset == 0 {
            interval.start
        } else {
            interval.start + Duration::seconds(step - offset)
        };

        while start + duration <= interval.end {
            slots.push(TimeRange { start, end: start + duration });
            start += Duration::seconds(step);
        }
    }

    slots
}
