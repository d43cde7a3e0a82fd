//! Urgent / current / upcoming classification of call slots.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use super::call_schedule::local_hour;

/// Default grace period before a pending call becomes urgent.
pub const DEFAULT_URGENT_AFTER_MINUTES: i64 = 30;

/// Time-based flags of a slot relative to "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStatus {
    /// More than the grace period in the past. Callers combine this with the
    /// call still being pending.
    pub is_overdue: bool,
    pub is_current: bool,
    pub is_upcoming: bool,
}

/// Classifies slots against a single sampled "now".
///
/// "Now" is converted into the configured zone once, at construction; every
/// slot is compared in that same zone.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    now: DateTime<Tz>,
    overdue_before: DateTime<Tz>,
}

impl StatusClassifier {
    pub fn new(now: DateTime<Utc>, tz: Tz, urgent_after: Duration) -> Self {
        let now = now.with_timezone(&tz);
        Self {
            now,
            overdue_before: now - urgent_after,
        }
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.now
    }

    pub fn timezone(&self) -> Tz {
        self.now.timezone()
    }

    pub fn classify(&self, slot: &DateTime<Tz>) -> SlotStatus {
        let slot = slot.with_timezone(&self.timezone());
        SlotStatus {
            is_overdue: slot < self.overdue_before,
            is_current: local_hour(&slot) == local_hour(&self.now),
            is_upcoming: slot > self.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Santiago;

    fn santiago(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Santiago.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn classifier_at(now: DateTime<Tz>) -> StatusClassifier {
        StatusClassifier::new(
            now.with_timezone(&Utc),
            Santiago,
            Duration::minutes(DEFAULT_URGENT_AFTER_MINUTES),
        )
    }

    #[test]
    fn test_current_hour_not_urgent() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 30));
        let status = classifier.classify(&santiago(2025, 9, 1, 14, 0));
        assert!(status.is_current);
        assert!(!status.is_overdue);
        assert!(!status.is_upcoming);
    }

    #[test]
    fn test_previous_hour_urgent() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 30));
        let status = classifier.classify(&santiago(2025, 9, 1, 13, 0));
        assert!(status.is_overdue);
        assert!(!status.is_current);
        assert!(!status.is_upcoming);
    }

    #[test]
    fn test_future_slot_upcoming() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 30));
        let status = classifier.classify(&santiago(2025, 9, 1, 15, 0));
        assert!(status.is_upcoming);
        assert!(!status.is_current);
        assert!(!status.is_overdue);
    }

    #[test]
    fn test_grace_period_boundary() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 30));
        // Exactly 30 minutes ago is not yet overdue
        assert!(!classifier.classify(&santiago(2025, 9, 1, 14, 0)).is_overdue);
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 31));
        assert!(classifier.classify(&santiago(2025, 9, 1, 14, 0)).is_overdue);
    }

    #[test]
    fn test_current_slot_can_be_upcoming() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 5));
        let status = classifier.classify(&santiago(2025, 9, 1, 14, 45));
        assert!(status.is_current);
        assert!(status.is_upcoming);
    }

    #[test]
    fn test_same_hour_on_other_day_not_current() {
        let classifier = classifier_at(santiago(2025, 9, 2, 14, 30));
        let status = classifier.classify(&santiago(2025, 9, 1, 14, 0));
        assert!(!status.is_current);
        assert!(status.is_overdue);
    }

    #[test]
    fn test_current_compares_local_hours_not_utc() {
        // now = 14:30 local = 18:30 UTC. A naive UTC comparison would flag the
        // 18:00 local slot as current.
        let now_utc = Utc.with_ymd_and_hms(2025, 9, 1, 18, 30, 0).unwrap();
        let classifier = StatusClassifier::new(now_utc, Santiago, Duration::minutes(30));

        assert!(classifier.classify(&santiago(2025, 9, 1, 14, 0)).is_current);
        assert!(!classifier.classify(&santiago(2025, 9, 1, 18, 0)).is_current);
        assert!(classifier.classify(&santiago(2025, 9, 1, 18, 0)).is_upcoming);
    }

    #[test]
    fn test_slot_in_other_zone_is_converted() {
        let classifier = classifier_at(santiago(2025, 9, 1, 14, 30));
        let slot_utc = Utc.with_ymd_and_hms(2025, 9, 1, 18, 10, 0).unwrap();
        let slot = slot_utc.with_timezone(&chrono_tz::UTC);
        assert!(classifier.classify(&slot).is_current);
    }

    #[test]
    fn test_now_converted_once() {
        let now_utc = Utc.with_ymd_and_hms(2025, 9, 1, 18, 30, 0).unwrap();
        let classifier = StatusClassifier::new(now_utc, Santiago, Duration::minutes(30));
        assert_eq!(classifier.now(), santiago(2025, 9, 1, 14, 30));
        assert_eq!(classifier.timezone(), Santiago);
    }
}
