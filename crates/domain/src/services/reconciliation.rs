//! Matching generated call slots with operator-recorded outcomes.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use super::call_schedule::{local_hour, GeneratedCallSlot};
use super::call_status::SlotStatus;
use super::message_template::{render_message, MessageContext};
use crate::models::{CallState, Installation, ReconciledCallEntry, RecordedCallOutcome};

/// Recorded outcomes keyed by installation and local hour.
///
/// When several outcomes land on the same key the latest write wins
/// (see [`RecordedCallOutcome::is_newer_than`]).
#[derive(Debug, Default)]
pub struct OutcomeIndex<'a> {
    by_hour: HashMap<(Uuid, NaiveDateTime), &'a RecordedCallOutcome>,
    duplicates: usize,
}

impl<'a> OutcomeIndex<'a> {
    pub fn build(outcomes: &'a [RecordedCallOutcome], tz: Tz) -> Self {
        let mut index = Self::default();
        for outcome in outcomes {
            let hour = local_hour(&outcome.scheduled_hour.with_timezone(&tz));
            match index.by_hour.entry((outcome.installation_id, hour)) {
                Entry::Occupied(mut kept) => {
                    index.duplicates += 1;
                    warn!(
                        installation_id = %outcome.installation_id,
                        hour = %hour,
                        "Multiple call outcomes recorded for the same hour, keeping the latest"
                    );
                    if outcome.is_newer_than(kept.get()) {
                        kept.insert(outcome);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(outcome);
                }
            }
        }
        index
    }

    pub fn get(
        &self,
        installation_id: Uuid,
        hour: NaiveDateTime,
    ) -> Option<&'a RecordedCallOutcome> {
        self.by_hour.get(&(installation_id, hour)).copied()
    }

    /// Number of outcomes discarded by the latest-write-wins rule.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_hour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hour.is_empty()
    }
}

/// Merges one slot with its outcome (if any) into an output row.
///
/// Without an outcome the slot reads as `pending`. Urgency only applies to
/// slots still pending.
pub fn reconcile_slot(
    slot: &GeneratedCallSlot,
    outcome: Option<&RecordedCallOutcome>,
    status: SlotStatus,
    installation: &Installation,
    message_template: Option<&str>,
) -> ReconciledCallEntry {
    let state = outcome.map_or(CallState::Pending, |o| o.state);
    let message = render_message(
        message_template,
        &MessageContext {
            installation: &installation.name,
            client: installation.client_name.as_deref(),
            slot_at: slot.slot_at,
        },
    );

    ReconciledCallEntry {
        installation_id: slot.installation_id,
        installation_name: installation.name.clone(),
        client_name: installation.client_name.clone(),
        contact_phone: installation.contact_phone.clone(),
        slot_at: slot.slot_at.fixed_offset(),
        local_date: slot.slot_at.date_naive(),
        local_time: slot.slot_at.format("%H:%M").to_string(),
        outcome_id: outcome.map(|o| o.id),
        state,
        observations: outcome.and_then(|o| o.observations.clone()),
        executed_at: outcome.and_then(|o| o.executed_at),
        is_urgent: status.is_overdue && state.is_pending(),
        is_current: status.is_current,
        is_upcoming: status.is_upcoming,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::America::Santiago;

    fn installation() -> Installation {
        Installation {
            id: Uuid::new_v4(),
            name: "Planta Renca".to_string(),
            client_name: Some("Envases del Pacífico".to_string()),
            contact_phone: Some("+56922223333".to_string()),
        }
    }

    fn outcome(
        installation_id: Uuid,
        scheduled_hour: DateTime<Utc>,
        state: CallState,
        updated_at: DateTime<Utc>,
    ) -> RecordedCallOutcome {
        RecordedCallOutcome {
            id: Uuid::new_v4(),
            installation_id,
            scheduled_hour,
            state,
            observations: Some(format!("{state}")),
            executed_at: state.executed_at(updated_at),
            created_at: updated_at,
            updated_at,
        }
    }

    fn slot(installation_id: Uuid, h: u32, m: u32) -> GeneratedCallSlot {
        GeneratedCallSlot {
            installation_id,
            slot_at: Santiago.with_ymd_and_hms(2025, 9, 1, h, m, 0).unwrap(),
        }
    }

    #[test]
    fn test_index_matches_by_local_hour() {
        let inst = installation();
        // 14:20 local = 18:20 UTC
        let recorded = vec![outcome(
            inst.id,
            Utc.with_ymd_and_hms(2025, 9, 1, 18, 20, 0).unwrap(),
            CallState::Successful,
            Utc::now(),
        )];
        let index = OutcomeIndex::build(&recorded, Santiago);

        let s = slot(inst.id, 14, 0);
        assert!(index.get(inst.id, s.local_hour()).is_some());
        assert!(index.get(inst.id, slot(inst.id, 18, 0).local_hour()).is_none());
        assert!(index.get(Uuid::new_v4(), s.local_hour()).is_none());
        assert_eq!(index.len(), 1);
        assert_eq!(index.duplicates(), 0);
    }

    #[test]
    fn test_index_latest_write_wins() {
        let inst = installation();
        let hour = Utc.with_ymd_and_hms(2025, 9, 1, 18, 0, 0).unwrap();
        let t0 = Utc.with_ymd_and_hms(2025, 9, 1, 18, 5, 0).unwrap();
        let recorded = vec![
            outcome(inst.id, hour, CallState::NoAnswer, t0),
            outcome(inst.id, hour, CallState::Successful, t0 + Duration::minutes(10)),
            outcome(inst.id, hour, CallState::Busy, t0 + Duration::minutes(2)),
        ];
        let index = OutcomeIndex::build(&recorded, Santiago);

        let kept = index.get(inst.id, slot(inst.id, 14, 0).local_hour()).unwrap();
        assert_eq!(kept.state, CallState::Successful);
        assert_eq!(index.duplicates(), 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_order_independent() {
        let inst = installation();
        let hour = Utc.with_ymd_and_hms(2025, 9, 1, 18, 0, 0).unwrap();
        let t0 = Utc.with_ymd_and_hms(2025, 9, 1, 18, 5, 0).unwrap();
        let mut recorded = vec![
            outcome(inst.id, hour, CallState::NoAnswer, t0),
            outcome(inst.id, hour, CallState::Incident, t0 + Duration::minutes(1)),
        ];
        let forward = OutcomeIndex::build(&recorded, Santiago)
            .get(inst.id, slot(inst.id, 14, 0).local_hour())
            .map(|o| o.id);
        recorded.reverse();
        let backward = OutcomeIndex::build(&recorded, Santiago)
            .get(inst.id, slot(inst.id, 14, 0).local_hour())
            .map(|o| o.id);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_reconcile_without_outcome_is_pending() {
        let inst = installation();
        let s = slot(inst.id, 13, 0);
        let status = SlotStatus {
            is_overdue: true,
            ..Default::default()
        };
        let entry = reconcile_slot(&s, None, status, &inst, None);

        assert_eq!(entry.state, CallState::Pending);
        assert!(entry.observations.is_none());
        assert!(entry.executed_at.is_none());
        assert!(entry.outcome_id.is_none());
        assert!(entry.is_urgent);
        assert_eq!(entry.local_time, "13:00");
        assert_eq!(entry.installation_name, "Planta Renca");
        assert!(entry.message.contains("Planta Renca"));
        assert_eq!(entry.slot_at.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_reconcile_with_outcome_overrides_state() {
        let inst = installation();
        let s = slot(inst.id, 13, 0);
        let recorded = outcome(
            inst.id,
            Utc.with_ymd_and_hms(2025, 9, 1, 17, 0, 0).unwrap(),
            CallState::Incident,
            Utc.with_ymd_and_hms(2025, 9, 1, 17, 3, 0).unwrap(),
        );
        let status = SlotStatus {
            is_overdue: true,
            ..Default::default()
        };
        let entry = reconcile_slot(&s, Some(&recorded), status, &inst, Some("{time}"));

        assert_eq!(entry.state, CallState::Incident);
        assert_eq!(entry.outcome_id, Some(recorded.id));
        assert_eq!(entry.observations.as_deref(), Some("incident"));
        assert_eq!(entry.executed_at, recorded.executed_at);
        // Handled calls are never urgent
        assert!(!entry.is_urgent);
        assert_eq!(entry.message, "13:00");
    }
}
