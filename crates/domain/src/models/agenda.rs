//! Monitoring agenda request/response models.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::call_outcome::CallState;
use super::installation::InstallationSummary;

/// Query parameters for the monitoring agenda.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaQuery {
    /// Operational day; defaults to the one containing "now".
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub installation_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Status tab selected in the agenda.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Current,
    Upcoming,
    Urgent,
    Completed,
    NotDone,
    Pending,
}

impl StatusFilter {
    pub fn matches(&self, entry: &ReconciledCallEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Current => entry.is_current,
            StatusFilter::Upcoming => entry.is_upcoming,
            StatusFilter::Urgent => entry.is_urgent,
            StatusFilter::Completed => entry.state.is_completed(),
            StatusFilter::NotDone => entry.state.is_not_done(),
            StatusFilter::Pending => entry.state.is_pending(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "current" => Ok(StatusFilter::Current),
            "upcoming" => Ok(StatusFilter::Upcoming),
            "urgent" => Ok(StatusFilter::Urgent),
            "completed" => Ok(StatusFilter::Completed),
            "not_done" => Ok(StatusFilter::NotDone),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(format!("Unknown status filter: {}", s)),
        }
    }
}

/// A generated call slot merged with its recorded outcome, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledCallEntry {
    pub installation_id: Uuid,
    pub installation_name: String,
    pub client_name: Option<String>,
    pub contact_phone: Option<String>,
    pub slot_at: DateTime<FixedOffset>,
    pub local_date: NaiveDate,
    pub local_time: String,
    pub outcome_id: Option<Uuid>,
    pub state: CallState,
    pub observations: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub is_urgent: bool,
    pub is_current: bool,
    pub is_upcoming: bool,
    pub message: String,
}

impl ReconciledCallEntry {
    /// Case-insensitive match on installation name, client name or
    /// observations. `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        let hit = |value: &str| value.to_lowercase().contains(needle);
        hit(&self.installation_name)
            || self.client_name.as_deref().is_some_and(hit)
            || self.observations.as_deref().is_some_and(hit)
    }
}

/// Aggregate counters shown on the agenda tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaCounts {
    pub total: usize,
    pub current: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub not_done: usize,
    pub urgent: usize,
}

impl AgendaCounts {
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a ReconciledCallEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut c, e| {
            c.total += 1;
            c.current += usize::from(e.is_current);
            c.upcoming += usize::from(e.is_upcoming);
            c.completed += usize::from(e.state.is_completed());
            c.not_done += usize::from(e.state.is_not_done());
            c.urgent += usize::from(e.is_urgent);
            c
        })
    }
}

/// Bounds of the operational day, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Response for the monitoring agenda.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaResponse {
    pub date: NaiveDate,
    pub timezone: String,
    pub window: AgendaWindow,
    pub generated_at: DateTime<Utc>,
    pub counts: AgendaCounts,
    pub entries: Vec<ReconciledCallEntry>,
    pub installations: Vec<InstallationSummary>,
}
