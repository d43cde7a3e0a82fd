//! Call slot generation.
//!
//! Turns a call window configuration plus the days with a planned shift into
//! timezone-aware call slots:
//!
//! 1. [`resolve_windows`] splits a window into one segment, or two when it
//!    wraps past midnight.
//! 2. [`SlotSeries`] walks a segment at the configured interval, both ends
//!    inclusive, in local calendar arithmetic.
//! 3. [`localize`] pins each local time to an instant in the configured zone.
//! 4. [`deduplicate_slots`] keeps the earliest slot per installation and
//!    local hour.

use chrono::{
    DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

use crate::models::CallWindowConfig;

/// A contiguous calling window in local wall-clock time. Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSegment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A derived, never persisted, check-in call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedCallSlot {
    pub installation_id: Uuid,
    pub slot_at: DateTime<Tz>,
}

impl GeneratedCallSlot {
    pub fn local_hour(&self) -> NaiveDateTime {
        local_hour(&self.slot_at)
    }
}

/// Resolves the calling window(s) of `config` for a day with a planned shift.
///
/// A disabled or incomplete configuration yields no segments.
pub fn resolve_windows(config: &CallWindowConfig, date: NaiveDate) -> Vec<WindowSegment> {
    let Some((_, start, end)) = config.schedulable() else {
        return Vec::new();
    };

    if start < end {
        return vec![WindowSegment {
            start: date.and_time(start),
            end: date.and_time(end),
        }];
    }

    // Wraps from midnight back to 23:59:59
    let end_of_day = NaiveTime::MIN - Duration::seconds(1);
    let mut segments = vec![WindowSegment {
        start: date.and_time(start),
        end: date.and_time(end_of_day),
    }];
    if let Some(next_day) = date.succ_opt() {
        segments.push(WindowSegment {
            start: next_day.and_time(NaiveTime::MIN),
            end: next_day.and_time(end),
        });
    }
    segments
}

/// Lazy series `start, start + step, ...` up to and including `end`.
#[derive(Debug, Clone)]
pub struct SlotSeries {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    step: Duration,
}

impl SlotSeries {
    /// A non-positive interval produces an empty series.
    pub fn new(segment: WindowSegment, interval_minutes: i32) -> Self {
        Self {
            next: (interval_minutes > 0).then_some(segment.start),
            end: segment.end,
            step: Duration::minutes(i64::from(interval_minutes)),
        }
    }
}

impl Iterator for SlotSeries {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|t| *t <= self.end)?;
        self.next = current.checked_add_signed(self.step);
        Some(current)
    }
}

/// Pins a local wall-clock time to an instant in `tz`.
///
/// Ambiguous times (clocks going back) take the earliest instant. Times
/// inside a spring-forward gap are read with the offset in force before the
/// gap, which lands them just past it.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
        return Some(instant);
    }
    let before_gap = tz
        .from_local_datetime(&(naive - Duration::days(1)))
        .earliest()?;
    let offset_secs = before_gap.offset().fix().local_minus_utc();
    let utc = naive - Duration::seconds(i64::from(offset_secs));
    Some(tz.from_utc_datetime(&utc))
}

/// Generates the raw (not yet deduplicated) slots of one config for one day.
pub fn generate_slots(
    config: &CallWindowConfig,
    date: NaiveDate,
    tz: Tz,
) -> impl Iterator<Item = GeneratedCallSlot> {
    let installation_id = config.installation_id;
    let interval = config.interval_minutes.unwrap_or(0);
    resolve_windows(config, date)
        .into_iter()
        .flat_map(move |segment| SlotSeries::new(segment, interval))
        .filter_map(move |naive| localize(tz, naive))
        .map(move |slot_at| GeneratedCallSlot {
            installation_id,
            slot_at,
        })
}

/// Generates raw slots for every config on every planned day of its installation.
pub fn generate_for_planned_days(
    configs: &[CallWindowConfig],
    planned_days: &BTreeMap<Uuid, BTreeSet<NaiveDate>>,
    tz: Tz,
) -> Vec<GeneratedCallSlot> {
    configs
        .iter()
        .flat_map(|config| {
            planned_days
                .get(&config.installation_id)
                .into_iter()
                .flatten()
                .flat_map(move |date| generate_slots(config, *date, tz))
        })
        .collect()
}

/// Keeps at most one slot per installation and local hour: the earliest.
///
/// Output is ordered by instant, then installation.
pub fn deduplicate_slots(
    slots: impl IntoIterator<Item = GeneratedCallSlot>,
) -> Vec<GeneratedCallSlot> {
    let mut earliest: HashMap<(Uuid, NaiveDateTime), GeneratedCallSlot> = HashMap::new();
    for slot in slots {
        earliest
            .entry((slot.installation_id, slot.local_hour()))
            .and_modify(|kept| {
                if slot.slot_at < kept.slot_at {
                    *kept = slot;
                }
            })
            .or_insert(slot);
    }

    let mut deduplicated: Vec<GeneratedCallSlot> = earliest.into_values().collect();
    deduplicated.sort_by_key(|s| (s.slot_at.with_timezone(&Utc), s.installation_id));
    deduplicated
}

/// Local date and hour of an instant, minutes and below dropped.
pub fn local_hour<T: TimeZone>(instant: &DateTime<T>) -> NaiveDateTime {
    let naive = instant.naive_local();
    naive.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(naive.hour()))
}

/// Moves an instant back to the top of its hour in `tz`.
pub fn truncate_to_local_hour(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(&tz);
    instant
        - Duration::minutes(i64::from(local.minute()))
        - Duration::seconds(i64::from(local.second()))
        - Duration::nanoseconds(i64::from(local.nanosecond()))
}
