//! Monitoring agenda for one operational day.
//!
//! The operational day runs from `day_start_hour` on `date` to the same hour
//! on the next calendar day. Shifts planned from the day before to the day
//! after are expanded so that overnight windows from either side are seen,
//! then only slots inside the operational window are kept.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::call_schedule::{deduplicate_slots, generate_for_planned_days, localize};
use super::call_status::{StatusClassifier, DEFAULT_URGENT_AFTER_MINUTES};
use super::reconciliation::{reconcile_slot, OutcomeIndex};
use crate::models::agenda::AgendaWindow;
use crate::models::shift_plan::planned_days;
use crate::models::{
    AgendaCounts, AgendaQuery, AgendaResponse, CallWindowConfig, Installation,
    InstallationSummary, ReconciledCallEntry, RecordedCallOutcome, ShiftPlan, StatusFilter,
};

/// Hour at which the operational day starts when not configured.
pub const DEFAULT_DAY_START_HOUR: u32 = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgendaError {
    #[error("Invalid operational day start hour: {0}")]
    InvalidStartHour(u32),

    #[error("Date out of supported range: {0}")]
    DateOutOfRange(NaiveDate),
}

/// Scheduling knobs shared by every agenda evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSettings {
    pub timezone: Tz,
    pub urgent_after: Duration,
    pub day_start_hour: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Santiago,
            urgent_after: Duration::minutes(DEFAULT_URGENT_AFTER_MINUTES),
            day_start_hour: DEFAULT_DAY_START_HOUR,
        }
    }
}

/// A `[start, end)` operational day in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationalDay {
    pub date: NaiveDate,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl OperationalDay {
    pub fn new(date: NaiveDate, settings: &ScheduleSettings) -> Result<Self, AgendaError> {
        let start_time = NaiveTime::from_hms_opt(settings.day_start_hour, 0, 0)
            .ok_or(AgendaError::InvalidStartHour(settings.day_start_hour))?;
        let next = date.succ_opt().ok_or(AgendaError::DateOutOfRange(date))?;

        let start = localize(settings.timezone, date.and_time(start_time))
            .ok_or(AgendaError::DateOutOfRange(date))?;
        let end = localize(settings.timezone, next.and_time(start_time))
            .ok_or(AgendaError::DateOutOfRange(date))?;

        Ok(Self { date, start, end })
    }

    /// The operational day `now` falls in. Before the start hour that is the
    /// previous calendar day.
    pub fn containing(
        now: DateTime<Utc>,
        settings: &ScheduleSettings,
    ) -> Result<Self, AgendaError> {
        let local = now.with_timezone(&settings.timezone);
        let today = local.date_naive();
        let date = if local.hour() < settings.day_start_hour {
            today.pred_opt().ok_or(AgendaError::DateOutOfRange(today))?
        } else {
            today
        };
        Self::new(date, settings)
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    /// Calendar dates whose planned shifts may produce slots in this day.
    pub fn shift_dates(&self) -> (NaiveDate, NaiveDate) {
        (
            self.date.pred_opt().unwrap_or(self.date),
            self.date.succ_opt().unwrap_or(self.date),
        )
    }

    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start.with_timezone(&Utc), self.end.with_timezone(&Utc))
    }

    pub fn window(&self) -> AgendaWindow {
        AgendaWindow {
            start: self.start.fixed_offset(),
            end: self.end.fixed_offset(),
        }
    }
}

/// Filters applied to agenda entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaFilters {
    pub status: StatusFilter,
    pub installation_id: Option<Uuid>,
    /// Lowercased, trimmed, `None` when blank.
    pub search: Option<String>,
}

impl AgendaFilters {
    pub fn from_query(query: &AgendaQuery) -> Result<Self, String> {
        let status = match query.status.as_deref() {
            Some(s) => s.parse()?,
            None => StatusFilter::All,
        };
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            status,
            installation_id: query.installation_id,
            search,
        })
    }

    fn keeps(&self, entry: &ReconciledCallEntry) -> bool {
        self.installation_id.map_or(true, |id| entry.installation_id == id)
            && self
                .search
                .as_deref()
                .map_or(true, |needle| entry.matches_search(needle))
    }
}

/// Data loaded for one agenda evaluation.
#[derive(Debug, Clone, Copy)]
pub struct AgendaSources<'a> {
    pub configs: &'a [CallWindowConfig],
    pub shift_plans: &'a [ShiftPlan],
    pub outcomes: &'a [RecordedCallOutcome],
    pub installations: &'a [Installation],
}

/// Agenda plus bookkeeping the caller may want to report.
#[derive(Debug, Clone)]
pub struct AgendaBuild {
    pub response: AgendaResponse,
    pub duplicate_outcomes: usize,
}

/// Builds the agenda of `day`.
///
/// `now` is the single sampled instant used for every classification.
/// Counts are taken after the installation and search filters but before the
/// status filter; the installation list ignores every filter.
pub fn build_agenda(
    day: &OperationalDay,
    sources: AgendaSources<'_>,
    filters: &AgendaFilters,
    settings: &ScheduleSettings,
    now: DateTime<Utc>,
) -> AgendaBuild {
    let tz = settings.timezone;
    let days = planned_days(sources.shift_plans);
    let raw = generate_for_planned_days(sources.configs, &days, tz);
    let raw_count = raw.len();
    let slots = deduplicate_slots(raw.into_iter().filter(|s| day.contains(&s.slot_at)));
    debug!(
        date = %day.date,
        generated = raw_count,
        kept = slots.len(),
        "Generated call slots"
    );

    let classifier = StatusClassifier::new(now, tz, settings.urgent_after);
    let outcomes = OutcomeIndex::build(sources.outcomes, tz);
    let installations: HashMap<Uuid, &Installation> =
        sources.installations.iter().map(|i| (i.id, i)).collect();
    let templates: HashMap<Uuid, Option<&str>> = sources
        .configs
        .iter()
        .map(|c| (c.installation_id, c.message_template.as_deref()))
        .collect();

    let mut all_entries = Vec::with_capacity(slots.len());
    let mut summaries: BTreeMap<Uuid, InstallationSummary> = BTreeMap::new();
    for slot in &slots {
        let fallback;
        let installation = match installations.get(&slot.installation_id) {
            Some(installation) => *installation,
            None => {
                warn!(
                    installation_id = %slot.installation_id,
                    "Call window refers to an unknown installation"
                );
                fallback = Installation {
                    id: slot.installation_id,
                    name: slot.installation_id.to_string(),
                    client_name: None,
                    contact_phone: None,
                };
                &fallback
            }
        };
        summaries
            .entry(slot.installation_id)
            .or_insert_with(|| InstallationSummary::from(installation));
        all_entries.push(reconcile_slot(
            slot,
            outcomes.get(slot.installation_id, slot.local_hour()),
            classifier.classify(&slot.slot_at),
            installation,
            templates.get(&slot.installation_id).copied().flatten(),
        ));
    }

    let mut summaries: Vec<InstallationSummary> = summaries.into_values().collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let filtered: Vec<ReconciledCallEntry> =
        all_entries.into_iter().filter(|e| filters.keeps(e)).collect();
    let counts = AgendaCounts::tally(&filtered);
    let entries: Vec<ReconciledCallEntry> = filtered
        .into_iter()
        .filter(|e| filters.status.matches(e))
        .collect();

    AgendaBuild {
        response: AgendaResponse {
            date: day.date,
            timezone: tz.name().to_string(),
            window: day.window(),
            generated_at: now,
            counts,
            entries,
            installations: summaries,
        },
        duplicate_outcomes: outcomes.duplicates(),
    }
}
